use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(description = "Todo list API with file attachments", license(name = "MIT or Apache2", identifier="MIT Apache2.0"), title = "Todo App", version = env!("CARGO_PKG_VERSION")),
    paths(
        crate::todos::list_todos,
        crate::todos::create_todo,
        crate::todos::get_todo,
        crate::todos::update_todo,
        crate::todos::delete_todo,
        crate::attachments::attach_file,
        crate::attachments::list_attachments,
        crate::attachments::detach_file,
        crate::files::list_files,
        crate::files::upload_file,
        crate::files::put_file,
        crate::files::download_file,
        crate::files::delete_file,
        crate::health,
    )
)]
pub struct ApiDoc;

pub(crate) fn api_route<T: Clone + Sync + Send + 'static>() -> Router<T> {
    let doc = ApiDoc::openapi();
    Router::new().merge(SwaggerUi::new("/v1/swagger-ui").url("/v1/openapi.json", doc))
}

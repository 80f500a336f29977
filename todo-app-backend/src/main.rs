use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use todo_app_backend::{build_app, cli::CliOpts, AppState};

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliOpts::parse();

    let my_filter = match cli.debug {
        true => "todo_app_backend=debug,todo_app=debug,tower_http=debug",
        false => "todo_app_backend=info,todo_app=info,tower_http=info",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| my_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let appstate = match AppState::new(&cli).await {
        Ok(state) => state,
        Err(err) => {
            error!("Failed to initialize application state: {}", err);
            return ExitCode::FAILURE;
        }
    };
    info!("Starting stage {}", appstate.stage);
    let shared_state = Arc::new(appstate);

    let app: axum::Router = build_app(&shared_state);

    let listener = match tokio::net::TcpListener::bind(&cli.as_addr()).await {
        Ok(val) => {
            info!("Listening on {}", cli.as_url());
            val
        }
        Err(err) => {
            error!("Failed to bind to {}: {:?}", cli.as_url(), err);
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {:?}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

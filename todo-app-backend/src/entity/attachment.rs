use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use todo_app_shared::todo::{format_timestamp, parse_timestamp};
use todo_app_shared::{Attachment, Identifier, TodoError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attachment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub todo_id: String,
    pub file_key: String,
    pub original_filename: String,
    pub file_size: i64,
    pub content_type: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::todo::Entity",
        from = "Column::TodoId",
        to = "super::todo::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Todo,
}

impl Related<super::todo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Todo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Attachment {
    type Error = TodoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let corrupt =
            |err: TodoError| TodoError::DatabaseError(format!("Stored attachment is invalid: {err}"));
        Attachment::new(
            Identifier::new(model.id).map_err(corrupt)?,
            Identifier::new(model.todo_id).map_err(corrupt)?,
            model.file_key,
            model.original_filename,
            model.file_size,
            model.content_type,
            parse_timestamp(&model.created_at)?,
        )
        .map_err(corrupt)
    }
}

impl From<&Attachment> for ActiveModel {
    fn from(attachment: &Attachment) -> Self {
        ActiveModel {
            id: Set(attachment.id().to_string()),
            todo_id: Set(attachment.todo_id().to_string()),
            file_key: Set(attachment.file_key().to_string()),
            original_filename: Set(attachment.original_filename().to_string()),
            file_size: Set(attachment.file_size()),
            content_type: Set(attachment.content_type().to_string()),
            created_at: Set(format_timestamp(&attachment.created_at())),
        }
    }
}

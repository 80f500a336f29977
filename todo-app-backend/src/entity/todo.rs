use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use todo_app_shared::PersistedTodo;

/// Timestamps are RFC 3339 text and `completed` is a 0/1 integer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todo")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attachment::Entity")]
    Attachments,
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PersistedTodo {
    fn from(model: Model) -> Self {
        PersistedTodo {
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<PersistedTodo> for ActiveModel {
    fn from(row: PersistedTodo) -> Self {
        ActiveModel {
            id: Set(row.id),
            title: Set(row.title),
            description: Set(row.description),
            completed: Set(row.completed),
            created_at: Set(row.created_at),
            updated_at: Set(row.updated_at),
        }
    }
}

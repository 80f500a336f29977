use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use todo_app_shared::{Identifier, Todo, TodoError};
use tracing::{debug, error};

use super::TodoRepository;
use crate::entity::todo;

#[derive(Clone)]
pub struct SeaOrmTodoRepository {
    conn: DatabaseConnection,
}

impl SeaOrmTodoRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl TodoRepository for SeaOrmTodoRepository {
    async fn save(&self, todo: &Todo) -> Result<(), TodoError> {
        todo::ActiveModel::from(todo.to_persisted())
            .insert(&self.conn)
            .await
            .inspect_err(|err| error!("Failed to insert todo {}: {:?}", todo.id(), err))?;
        debug!("Saved todo {}", todo.id());
        Ok(())
    }

    async fn find_by_id(&self, id: &Identifier) -> Result<Option<Todo>, TodoError> {
        todo::Entity::find_by_id(id.as_str())
            .one(&self.conn)
            .await?
            .map(|model| Todo::from_persisted(model.into()))
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<Todo>, TodoError> {
        todo::Entity::find()
            .order_by_desc(todo::Column::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|model| Todo::from_persisted(model.into()))
            .collect()
    }

    async fn update(&self, todo: &Todo) -> Result<bool, TodoError> {
        let row = todo.to_persisted();
        let changes = todo::ActiveModel {
            title: Set(row.title),
            description: Set(row.description),
            completed: Set(row.completed),
            updated_at: Set(row.updated_at),
            ..Default::default()
        };
        let res = todo::Entity::update_many()
            .set(changes)
            .filter(todo::Column::Id.eq(row.id))
            .exec(&self.conn)
            .await
            .inspect_err(|err| error!("Failed to update todo {}: {:?}", todo.id(), err))?;
        Ok(res.rows_affected > 0)
    }

    async fn delete(&self, id: &Identifier) -> Result<bool, TodoError> {
        let res = todo::Entity::delete_by_id(id.as_str())
            .exec(&self.conn)
            .await
            .inspect_err(|err| error!("Failed to delete todo {}: {:?}", id, err))?;
        Ok(res.rows_affected > 0)
    }
}

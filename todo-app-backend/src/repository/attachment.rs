use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use todo_app_shared::{Attachment, Identifier, TodoError};
use tracing::{debug, error};

use super::AttachmentRepository;
use crate::entity::attachment;

#[derive(Clone)]
pub struct SeaOrmAttachmentRepository {
    conn: DatabaseConnection,
}

impl SeaOrmAttachmentRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl AttachmentRepository for SeaOrmAttachmentRepository {
    async fn save(&self, attachment: &Attachment) -> Result<(), TodoError> {
        attachment::ActiveModel::from(attachment)
            .insert(&self.conn)
            .await
            .inspect_err(|err| error!("Failed to save attachment: {:?}", err))?;
        debug!(
            "Created attachment {} for todo {}",
            attachment.id(),
            attachment.todo_id()
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &Identifier) -> Result<Option<Attachment>, TodoError> {
        attachment::Entity::find_by_id(id.as_str())
            .one(&self.conn)
            .await?
            .map(Attachment::try_from)
            .transpose()
    }

    async fn find_by_todo_id(&self, todo_id: &Identifier) -> Result<Vec<Attachment>, TodoError> {
        attachment::Entity::find()
            .filter(attachment::Column::TodoId.eq(todo_id.as_str()))
            .order_by_desc(attachment::Column::CreatedAt)
            .all(&self.conn)
            .await
            .inspect_err(|err| error!("Failed to list attachments: {:?}", err))?
            .into_iter()
            .map(Attachment::try_from)
            .collect()
    }

    async fn delete(&self, id: &Identifier) -> Result<bool, TodoError> {
        let res = attachment::Entity::delete_by_id(id.as_str())
            .exec(&self.conn)
            .await
            .inspect_err(|err| error!("Failed to delete attachment: {:?}", err))?;
        debug!("Deleted attachment {}", id);
        Ok(res.rows_affected > 0)
    }

    async fn delete_by_todo_id(&self, todo_id: &Identifier) -> Result<u64, TodoError> {
        let res = attachment::Entity::delete_many()
            .filter(attachment::Column::TodoId.eq(todo_id.as_str()))
            .exec(&self.conn)
            .await?;
        debug!(
            "Deleted {} attachments for todo {}",
            res.rows_affected, todo_id
        );
        Ok(res.rows_affected)
    }
}

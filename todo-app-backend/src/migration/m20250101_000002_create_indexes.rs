use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // listings are newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_todo_created_at")
                    .table(Todo::Table)
                    .col(Todo::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attachment_todo_id")
                    .table(Attachment::Table)
                    .col(Attachment::TodoId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_attachment_todo_id")
                    .table(Attachment::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_todo_created_at")
                    .table(Todo::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Todo {
    Table,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Attachment {
    Table,
    TodoId,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Message: 按联系人读取并按时间倒序
        manager
            .create_index(
                Index::create()
                    .name("idx_message_contact_ts")
                    .table(Message::Table)
                    .col(Message::ContactId)
                    .col(Message::MessageTimestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // User: 登录按用户名查找
        manager
            .create_index(
                Index::create()
                    .name("idx_user_user")
                    .table(User::Table)
                    .col(User::User)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_user_user").table(User::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_message_contact_ts").table(Message::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Message { Table, ContactId, MessageTimestamp }

#[derive(DeriveIden)]
enum User { Table, User }

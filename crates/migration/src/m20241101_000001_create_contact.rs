//! Create `contact` table.
//!
//! `contact_name` carries a unique constraint so duplicate inserts are rejected by the store.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contact::Table)
                    .if_not_exists()
                    .col(pk_auto(Contact::Id))
                    .col(string_len(Contact::ContactName, 255).unique_key().not_null())
                    .col(string_len(Contact::PhoneNumber, 64).not_null())
                    .col(text(Contact::Message).not_null())
                    // image_url 可为空：联系人不一定有头像
                    .col(
                        ColumnDef::new(Contact::ImageUrl)
                            .string_len(512)
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Contact::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Contact { Table, Id, ContactName, PhoneNumber, Message, ImageUrl }

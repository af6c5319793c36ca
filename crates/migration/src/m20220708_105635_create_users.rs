//! Create `users` table.
//!
//! One row per user; `email` carries a unique index so the database rejects
//! duplicates even if two writers pass the application-level check at once.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(string_len(Users::Id, 36).primary_key())
                    .col(string_len(Users::FirstName, 255).not_null())
                    .col(string_len(Users::LastName, 255).not_null())
                    .col(string_len(Users::Email, 255).not_null())
                    .col(string_len(Users::Password, 255).not_null())
                    .col(date_time(Users::Created).not_null())
                    .col(ColumnDef::new(Users::Updated).date_time().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, FirstName, LastName, Email, Password, Created, Updated }

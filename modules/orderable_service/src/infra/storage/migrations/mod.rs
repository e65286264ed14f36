//! Database migrations for the orderable service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241210_000001_create_content::Migration),
            Box::new(m20261018_000001_index_content_url_name::Migration),
        ]
    }
}

mod m20241210_000001_create_content {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Content::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Content::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Content::MenuId).big_integer().not_null())
                        .col(ColumnDef::new(Content::Position).integer().not_null())
                        .col(ColumnDef::new(Content::Name).string().not_null())
                        .col(ColumnDef::new(Content::UrlName).string().not_null())
                        .col(ColumnDef::new(Content::Text).text().not_null())
                        .col(
                            ColumnDef::new(Content::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Content::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Content::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            // One item per slot within a menu
            manager
                .create_index(
                    Index::create()
                        .name("ux_content_menu_position")
                        .table(Content::Table)
                        .col(Content::MenuId)
                        .col(Content::Position)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Content::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Content {
        Table,
        Id,
        MenuId,
        Position,
        Name,
        UrlName,
        Text,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20261018_000001_index_content_url_name {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Storefront pages are looked up by url name
            manager
                .create_index(
                    Index::create()
                        .name("ix_content_url_name")
                        .table(Content::Table)
                        .col(Content::UrlName)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_index(
                    Index::drop()
                        .name("ix_content_url_name")
                        .table(Content::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Content {
        Table,
        UrlName,
    }
}

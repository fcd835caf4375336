use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Activities::Pk).string().not_null())
                    .col(ColumnDef::new(Activities::Sk).string().not_null())
                    .col(ColumnDef::new(Activities::EntityType).string().not_null())
                    .col(ColumnDef::new(Activities::EntityId).string().not_null())
                    .col(ColumnDef::new(Activities::Title).string().not_null())
                    .col(ColumnDef::new(Activities::SourceUrl).string().not_null())
                    .col(ColumnDef::new(Activities::Domain).string().not_null())
                    .col(ColumnDef::new(Activities::Data).json().not_null())
                    .col(
                        ColumnDef::new(Activities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Activities::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(Index::create().col(Activities::Pk).col(Activities::Sk))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_domain")
                    .table(Activities::Table)
                    .col(Activities::Domain)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Pk,
    Sk,
    EntityType,
    EntityId,
    Title,
    SourceUrl,
    Domain,
    Data,
    CreatedAt,
    UpdatedAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScrapingTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapingTasks::TaskId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapingTasks::SourceId).string().not_null())
                    .col(ColumnDef::new(ScrapingTasks::SourceName).string().not_null())
                    .col(ColumnDef::new(ScrapingTasks::BaseUrl).string().not_null())
                    .col(ColumnDef::new(ScrapingTasks::TaskType).string().not_null())
                    .col(
                        ColumnDef::new(ScrapingTasks::Priority)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(ScrapingTasks::ScheduledTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScrapingTasks::TargetUrls).json().not_null())
                    .col(
                        ColumnDef::new(ScrapingTasks::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ScrapingTasks::ErrorMessage).text())
                    .col(
                        ColumnDef::new(ScrapingTasks::AttemptCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapingTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapingTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scraping_tasks_status")
                    .table(ScrapingTasks::Table)
                    .col(ScrapingTasks::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scraping_tasks_source_id")
                    .table(ScrapingTasks::Table)
                    .col(ScrapingTasks::SourceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapingTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapingTasks {
    Table,
    TaskId,
    SourceId,
    SourceName,
    BaseUrl,
    TaskType,
    Priority,
    ScheduledTime,
    TargetUrls,
    Status,
    ErrorMessage,
    AttemptCount,
    CreatedAt,
    UpdatedAt,
}

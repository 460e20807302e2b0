use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Owner lookups in list and sum
        manager
            .create_index(
                Index::create()
                    .name("idx_service_list_uuid")
                    .table(ServiceList::Table)
                    .col(ServiceList::ServiceUuid)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Default ordering and date range filters
        manager
            .create_index(
                Index::create()
                    .name("idx_service_list_created_at")
                    .table(ServiceList::Table)
                    .col(ServiceList::ServiceCreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_list_created_at")
                    .table(ServiceList::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_service_list_uuid").table(ServiceList::Table).to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceList {
    Table,
    ServiceUuid,
    ServiceCreatedAt,
}

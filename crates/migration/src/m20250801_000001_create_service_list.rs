//! Create `service_list` table.
//!
//! One row per subscription service. `service_created_at` holds the start
//! month (first day, midnight UTC) and doubles as the default sort key.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceList::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceList::ServiceId))
                    // keep in step with models::subscription::MAX_NAME_LEN
                    .col(string_len(ServiceList::ServiceName, 255).not_null())
                    .col(
                        integer(ServiceList::ServicePrice)
                            .not_null()
                            .check(Expr::col(ServiceList::ServicePrice).gte(0)),
                    )
                    .col(uuid(ServiceList::ServiceUuid).not_null())
                    .col(timestamp_with_time_zone(ServiceList::ServiceCreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceList::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceList {
    Table,
    ServiceId,
    ServiceName,
    ServicePrice,
    ServiceUuid,
    ServiceCreatedAt,
}

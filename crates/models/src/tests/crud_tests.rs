use anyhow::Result;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryFilter, ColumnTrait, Set};
use uuid::Uuid;

use super::setup_test_db;
use crate::period::StartPeriod;
use crate::subscription;

fn active(name: &str, price: i32, owner: Uuid, start: &str) -> subscription::ActiveModel {
    subscription::ActiveModel {
        service_name: Set(name.to_string()),
        service_price: Set(price),
        service_uuid: Set(owner),
        service_created_at: Set(StartPeriod::parse(start).unwrap().first_instant()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_subscription_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let owner = Uuid::new_v4();

    // Create
    let created = active("Yandex Plus", 400, owner, "08-2025").insert(&db).await?;
    assert!(created.service_id > 0);
    assert_eq!(StartPeriod::from_timestamp(&created.service_created_at).to_string(), "08-2025");

    // Read
    let found = subscription::Entity::find_by_id(created.service_id).one(&db).await?;
    let found = found.expect("row just inserted");
    assert_eq!(found.service_name, "Yandex Plus");
    assert_eq!(found.service_uuid, owner);

    // Update
    let mut am: subscription::ActiveModel = found.into();
    am.service_price = Set(500);
    let updated = am.update(&db).await?;
    assert_eq!(updated.service_price, 500);

    let by_owner = subscription::Entity::find()
        .filter(subscription::Column::ServiceUuid.eq(owner))
        .all(&db)
        .await?;
    assert_eq!(by_owner.len(), 1);

    // Delete
    let res = subscription::Entity::delete_by_id(created.service_id).exec(&db).await?;
    assert_eq!(res.rows_affected, 1);
    let after = subscription::Entity::find_by_id(created.service_id).one(&db).await?;
    assert!(after.is_none());
    Ok(())
}

#[tokio::test]
async fn test_ids_are_not_reused() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let owner = Uuid::new_v4();

    let first = active("Music", 100, owner, "01-2024").insert(&db).await?;
    subscription::Entity::delete_by_id(first.service_id).exec(&db).await?;
    let second = active("Music", 100, owner, "01-2024").insert(&db).await?;
    assert!(second.service_id > first.service_id);

    subscription::Entity::delete_by_id(second.service_id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_negative_price_violates_check() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let res = active("Broken", -1, Uuid::new_v4(), "01-2024").insert(&db).await;
    assert!(res.is_err());
    Ok(())
}

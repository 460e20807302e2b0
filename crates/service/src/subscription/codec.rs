//! Wire ⇄ domain ⇄ stored conversions for subscription records.

use models::errors::ModelError;
use models::period::StartPeriod;
use models::subscription;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JSON body of create/update and of get/list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPayload {
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    pub items: Vec<SubscriptionPayload>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumResult {
    pub total: i64,
}

/// Validated subscription, independent of wire and storage shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub name: String,
    pub price: i32,
    pub owner: Uuid,
    pub start: StartPeriod,
}

impl TryFrom<SubscriptionPayload> for Subscription {
    type Error = ModelError;

    fn try_from(p: SubscriptionPayload) -> Result<Self, Self::Error> {
        subscription::validate_name(&p.service_name)?;
        subscription::validate_price(p.price)?;
        let start = StartPeriod::parse(&p.start_date)?;
        let owner = Uuid::parse_str(&p.user_id)
            .map_err(|_| ModelError::Validation("invalid uuid".into()))?;
        Ok(Self { name: p.service_name, price: p.price, owner, start })
    }
}

impl From<&Subscription> for SubscriptionPayload {
    fn from(s: &Subscription) -> Self {
        Self {
            service_name: s.name.clone(),
            price: s.price,
            user_id: s.owner.hyphenated().to_string(),
            start_date: s.start.to_string(),
        }
    }
}

impl From<Subscription> for SubscriptionPayload {
    fn from(s: Subscription) -> Self {
        Self::from(&s)
    }
}

impl From<subscription::Model> for Subscription {
    fn from(m: subscription::Model) -> Self {
        Self {
            start: StartPeriod::from_timestamp(&m.service_created_at),
            name: m.service_name,
            price: m.service_price,
            owner: m.service_uuid,
        }
    }
}

impl Subscription {
    /// Active model for insert (`id = None`) or full replacement (`id = Some`).
    pub fn to_active_model(&self, id: Option<i32>) -> subscription::ActiveModel {
        subscription::ActiveModel {
            service_id: id.map_or(NotSet, Set),
            service_name: Set(self.name.clone()),
            service_price: Set(self.price),
            service_uuid: Set(self.owner),
            service_created_at: Set(self.start.first_instant()),
        }
    }
}

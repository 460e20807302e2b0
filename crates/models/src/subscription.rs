use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

/// Stored row of `service_list`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_list")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub service_id: i32,
    pub service_name: String,
    pub service_price: i32,
    pub service_uuid: Uuid,
    /// Start month, stored as its first instant.
    pub service_created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Width of the `service_name` column, in characters.
pub const MAX_NAME_LEN: usize = 255;

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(errors::ModelError::Validation(format!(
            "name longer than {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_price(price: i32) -> Result<(), errors::ModelError> {
    if price < 0 {
        return Err(errors::ModelError::Validation("price must be >= 0".into()));
    }
    Ok(())
}

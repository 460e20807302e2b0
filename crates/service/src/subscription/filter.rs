//! Filter model for list and sum queries.
//!
//! Raw query parameters arrive as optional strings. Owner identity, price
//! and date bounds fail closed: a malformed value is rejected. Sort key,
//! direction and limit fail open: anything unrecognised falls back to the
//! default. `price <= 0` is treated as "no price constraint".

use models::period::StartPeriod;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ServiceError;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;

/// Query string of `GET /service` and `GET /service/sum`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub name: Option<String>,
    pub user_id: Option<String>,
    pub price: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    Price,
    Name,
}

impl SortKey {
    /// Case-insensitive; accepts both column names and short names.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("service_price" | "price") => SortKey::Price,
            Some("service_name" | "name") => SortKey::Name,
            _ => SortKey::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => SortDir::Asc,
            _ => SortDir::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Result size bound, always within `MIN_LIMIT..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(i64);

impl Limit {
    pub fn clamped(n: i64) -> Self {
        Self(n.clamp(MIN_LIMIT, MAX_LIMIT))
    }

    /// Missing or non-numeric input yields the default; numbers are clamped,
    /// including ones too large for `i64`.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };
        match s.parse::<i64>() {
            Ok(n) => Self::clamped(n),
            Err(_) => {
                let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    if s.starts_with('-') { Self(MIN_LIMIT) } else { Self(MAX_LIMIT) }
                } else {
                    Self::default()
                }
            }
        }
    }

    pub fn get(&self) -> i64 { self.0 }
}

impl Default for Limit {
    fn default() -> Self { Self(DEFAULT_LIMIT) }
}

/// Constraints for listing rows. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub name: Option<String>,
    pub price: Option<i32>,
    pub owner: Option<Uuid>,
    pub from: Option<StartPeriod>,
    pub to: Option<StartPeriod>,
    pub sort: SortKey,
    pub dir: SortDir,
    pub limit: Limit,
}

/// Constraints for the price total. Aggregation has no ordering, limit or price filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SumFilter {
    pub name: Option<String>,
    pub owner: Option<Uuid>,
    pub from: Option<StartPeriod>,
    pub to: Option<StartPeriod>,
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.is_empty())
}

/// Trimmed name; blank means absent.
pub fn normalize_name(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Exact price. Non-integers are rejected; zero and negatives mean "absent".
pub fn parse_price(raw: Option<&str>) -> Result<Option<i32>, ServiceError> {
    let Some(s) = raw else { return Ok(None) };
    let price: i32 = s
        .trim()
        .parse()
        .map_err(|_| ServiceError::Validation("bad price".into()))?;
    Ok((price > 0).then_some(price))
}

pub fn parse_owner(raw: Option<&str>) -> Result<Option<Uuid>, ServiceError> {
    raw.map(|s| {
        Uuid::parse_str(s.trim()).map_err(|_| ServiceError::Validation("bad user_id".into()))
    })
    .transpose()
}

pub fn parse_bound(raw: Option<&str>, field: &str) -> Result<Option<StartPeriod>, ServiceError> {
    raw.map(|s| {
        StartPeriod::parse(s.trim())
            .map_err(|_| ServiceError::Validation(format!("bad {field} (want MM-YYYY)")))
    })
    .transpose()
}

impl FilterParams {
    pub fn list_filter(&self) -> Result<ListFilter, ServiceError> {
        Ok(ListFilter {
            name: normalize_name(present(&self.name)),
            price: parse_price(present(&self.price))?,
            owner: parse_owner(present(&self.user_id))?,
            from: parse_bound(present(&self.from), "from")?,
            to: parse_bound(present(&self.to), "to")?,
            sort: SortKey::parse_or_default(present(&self.sort)),
            dir: SortDir::parse_or_default(present(&self.dir)),
            limit: Limit::parse_or_default(present(&self.limit)),
        })
    }

    /// `price`, `sort`, `dir` and `limit` are ignored here.
    pub fn sum_filter(&self) -> Result<SumFilter, ServiceError> {
        Ok(SumFilter {
            name: normalize_name(present(&self.name)),
            owner: parse_owner(present(&self.user_id))?,
            from: parse_bound(present(&self.from), "from")?,
            to: parse_bound(present(&self.to), "to")?,
        })
    }
}

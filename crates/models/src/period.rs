//! Month-granularity start period.
//!
//! The wire form is `MM-YYYY` (two-digit month, four-digit year). In storage
//! the period is the first instant of the month in UTC; day and time carry no
//! meaning and are dropped when reading a timestamp back.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::ModelError;

/// A calendar month, always held as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StartPeriod(NaiveDate);

impl StartPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, ModelError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| ModelError::Validation(format!("invalid month {month:02}-{year:04}")))
    }

    /// Parse `MM-YYYY`. Anything else, including single-digit months or
    /// surrounding whitespace, is rejected.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::Validation("invalid date (want MM-YYYY)".into());
        let (mm, yyyy) = s.split_once('-').ok_or_else(invalid)?;
        if mm.len() != 2 || yyyy.len() != 4 {
            return Err(invalid());
        }
        if !mm.bytes().chain(yyyy.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let month: u32 = mm.parse().map_err(|_| invalid())?;
        let year: i32 = yyyy.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 { self.0.year() }
    pub fn month(&self) -> u32 { self.0.month() }

    /// Midnight UTC on the first day of the month.
    pub fn first_instant(&self) -> DateTimeWithTimeZone {
        self.0.and_time(NaiveTime::MIN).and_utc().into()
    }

    /// Truncate a stored timestamp to its month, evaluated in UTC.
    pub fn from_timestamp(ts: &DateTimeWithTimeZone) -> Self {
        let date = ts.with_timezone(&Utc).date_naive();
        Self(date - Days::new(u64::from(date.day0())))
    }
}

impl fmt::Display for StartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl FromStr for StartPeriod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

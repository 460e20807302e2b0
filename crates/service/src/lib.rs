//! Service layer for subscription records.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Compiles list/sum filters into parameterized SQL.

pub mod errors;
pub mod subscription;
#[cfg(test)]
pub mod test_support;

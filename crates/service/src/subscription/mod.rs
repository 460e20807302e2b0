//! Subscription service records: filter model, query compiler, record codec,
//! persistence and the application service on top of them.

pub mod codec;
pub mod filter;
pub mod query;
pub mod repository;
pub mod service;

pub use codec::{CreatedId, ListResult, Subscription, SubscriptionPayload, SumResult};
pub use filter::{FilterParams, ListFilter, SumFilter};
pub use repository::{SeaOrmSubscriptionRepository, SubscriptionRepository};
pub use service::SubscriptionService;

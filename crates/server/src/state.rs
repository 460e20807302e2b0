use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::subscription::{
    SeaOrmSubscriptionRepository, SubscriptionRepository, SubscriptionService,
};

/// Shared handler state. Cloned per request; the repository behind it is shared.
#[derive(Clone)]
pub struct AppState {
    pub subscriptions: SubscriptionService<dyn SubscriptionRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions: SubscriptionService::new(repo) }
    }

    pub fn from_db(db: DatabaseConnection) -> Self {
        Self::new(Arc::new(SeaOrmSubscriptionRepository::new(db)))
    }
}

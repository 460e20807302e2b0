use std::sync::Arc;

use tracing::{info, instrument};

use super::codec::{CreatedId, ListResult, Subscription, SubscriptionPayload, SumResult};
use super::filter::FilterParams;
use super::repository::SubscriptionRepository;
use crate::errors::ServiceError;

/// Application service for subscription records.
///
/// Takes wire-level input (path ids as text, JSON payloads, raw query
/// parameters), validates it, and returns wire-level output.
pub struct SubscriptionService<R: SubscriptionRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: SubscriptionRepository + ?Sized> Clone for SubscriptionService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

/// Parse a path-carried record id. Only plain ASCII digits are accepted, so
/// one record has one path.
pub fn parse_id(raw: &str) -> Result<i32, ServiceError> {
    let invalid = || ServiceError::Validation(format!("invalid id {raw:?}"));
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse::<i32>().map_err(|_| invalid())
}

impl<R: SubscriptionRepository + ?Sized> SubscriptionService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self, input), fields(name = %input.service_name))]
    pub async fn create(&self, input: SubscriptionPayload) -> Result<CreatedId, ServiceError> {
        let record = Subscription::try_from(input)?;
        let id = self.repo.create(&record).await?;
        info!(id, owner = %record.owner, "service created");
        Ok(CreatedId { id })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, raw_id: &str) -> Result<SubscriptionPayload, ServiceError> {
        let id = parse_id(raw_id)?;
        match self.repo.get(id).await? {
            Some(record) => Ok(SubscriptionPayload::from(record)),
            None => Err(ServiceError::not_found("service")),
        }
    }

    /// Full replacement of all four fields.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        raw_id: &str,
        input: SubscriptionPayload,
    ) -> Result<(), ServiceError> {
        let id = parse_id(raw_id)?;
        let record = Subscription::try_from(input)?;
        if !self.repo.update(id, &record).await? {
            return Err(ServiceError::not_found("service"));
        }
        info!(id, "service updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, raw_id: &str) -> Result<(), ServiceError> {
        let id = parse_id(raw_id)?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("service"));
        }
        info!(id, "service deleted");
        Ok(())
    }

    #[instrument(skip(self, params))]
    pub async fn list(&self, params: &FilterParams) -> Result<ListResult, ServiceError> {
        let filter = params.list_filter()?;
        let rows = self.repo.list(&filter).await?;
        info!(count = rows.len(), "services listed");
        Ok(ListResult { items: rows.into_iter().map(SubscriptionPayload::from).collect() })
    }

    #[instrument(skip(self, params))]
    pub async fn sum(&self, params: &FilterParams) -> Result<SumResult, ServiceError> {
        let filter = params.sum_filter()?;
        let total = self.repo.sum(&filter).await?;
        Ok(SumResult { total })
    }
}

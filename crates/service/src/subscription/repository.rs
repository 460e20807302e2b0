use async_trait::async_trait;
use models::subscription;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult};
use tracing::{debug, error};

use super::codec::Subscription;
use super::filter::{ListFilter, SumFilter};
use super::query;
use crate::errors::ServiceError;

/// Persistence for subscription records. Point operations address the
/// store-assigned integer id.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, s: &Subscription) -> Result<i32, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<Subscription>, ServiceError>;
    /// Replace all fields; `false` when no row has `id`.
    async fn update(&self, id: i32, s: &Subscription) -> Result<bool, ServiceError>;
    /// `false` when no row has `id`.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>, ServiceError>;
    async fn sum(&self, filter: &SumFilter) -> Result<i64, ServiceError>;
}

#[derive(Debug, FromQueryResult)]
struct TotalRow {
    total: i64,
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmSubscriptionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn db_error(op: &'static str) -> impl Fn(DbErr) -> ServiceError {
    move |e| {
        error!(op, err = %e, "query failed");
        ServiceError::Db(e.to_string())
    }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, s: &Subscription) -> Result<i32, ServiceError> {
        let created = s.to_active_model(None).insert(&self.db).await.map_err(db_error("create"))?;
        debug!(id = created.service_id, "create done");
        Ok(created.service_id)
    }

    async fn get(&self, id: i32) -> Result<Option<Subscription>, ServiceError> {
        let found = subscription::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("get"))?;
        Ok(found.map(Subscription::from))
    }

    async fn update(&self, id: i32, s: &Subscription) -> Result<bool, ServiceError> {
        match s.to_active_model(Some(id)).update(&self.db).await {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(db_error("update")(e)),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = subscription::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("delete"))?;
        Ok(res.rows_affected > 0)
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>, ServiceError> {
        let q = query::compile_list(filter);
        debug!(sql = %q.sql, params = q.values.len(), "list query");
        let rows = subscription::Model::find_by_statement(q.into_statement())
            .all(&self.db)
            .await
            .map_err(db_error("list"))?;
        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    async fn sum(&self, filter: &SumFilter) -> Result<i64, ServiceError> {
        let q = query::compile_sum(filter);
        debug!(sql = %q.sql, params = q.values.len(), "sum query");
        let row = TotalRow::find_by_statement(q.into_statement())
            .one(&self.db)
            .await
            .map_err(db_error("sum"))?;
        Ok(row.map_or(0, |r| r.total))
    }
}

/// Simple in-memory mock repository for tests and doc examples.
///
/// Filters are evaluated in Rust with the same semantics the SQL has:
/// case-insensitive substring on name, inclusive month bounds, whitelist sort.
pub mod mock {
    use super::*;
    use crate::subscription::filter::{SortDir, SortKey};
    use models::period::StartPeriod;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockSubscriptionRepository {
        rows: Mutex<BTreeMap<i32, Subscription>>,
        next_id: Mutex<i32>,
        fail: Mutex<bool>,
    }

    impl MockSubscriptionRepository {
        /// Make every following call fail like a lost connection.
        pub fn fail_all(&self) {
            *self.fail.lock().unwrap() = true;
        }

        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn check(&self) -> Result<(), ServiceError> {
            if *self.fail.lock().unwrap() {
                return Err(ServiceError::Db("connection refused".into()));
            }
            Ok(())
        }
    }

    fn matches(
        s: &Subscription,
        name: Option<&str>,
        owner: Option<uuid::Uuid>,
        from: Option<&StartPeriod>,
        to: Option<&StartPeriod>,
    ) -> bool {
        name.map_or(true, |n| s.name.to_lowercase().contains(&n.to_lowercase()))
            && owner.map_or(true, |o| s.owner == o)
            && from.map_or(true, |f| s.start >= *f)
            && to.map_or(true, |t| s.start <= *t)
    }

    #[async_trait]
    impl SubscriptionRepository for MockSubscriptionRepository {
        async fn create(&self, s: &Subscription) -> Result<i32, ServiceError> {
            self.check()?;
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            self.rows.lock().unwrap().insert(*next, s.clone());
            Ok(*next)
        }

        async fn get(&self, id: i32) -> Result<Option<Subscription>, ServiceError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn update(&self, id: i32, s: &Subscription) -> Result<bool, ServiceError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(row) => {
                    *row = s.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }

        async fn list(&self, f: &ListFilter) -> Result<Vec<Subscription>, ServiceError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            let mut hits: Vec<(i32, Subscription)> = rows
                .iter()
                .filter(|(_, s)| {
                    matches(s, f.name.as_deref(), f.owner, f.from.as_ref(), f.to.as_ref())
                })
                .filter(|(_, s)| f.price.filter(|p| *p > 0).map_or(true, |p| s.price == p))
                .map(|(id, s)| (*id, s.clone()))
                .collect();
            hits.sort_by(|(ia, a), (ib, b)| {
                let primary = match f.sort {
                    SortKey::CreatedAt => a.start.cmp(&b.start),
                    SortKey::Price => a.price.cmp(&b.price),
                    SortKey::Name => a.name.cmp(&b.name),
                };
                let ord = primary.then(ia.cmp(ib));
                match f.dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                }
            });
            Ok(hits.into_iter().take(f.limit.get() as usize).map(|(_, s)| s).collect())
        }

        async fn sum(&self, f: &SumFilter) -> Result<i64, ServiceError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .values()
                .filter(|s| matches(s, f.name.as_deref(), f.owner, f.from.as_ref(), f.to.as_ref()))
                .map(|s| i64::from(s.price))
                .sum())
        }
    }
}

//! In-memory subscription repository implementation.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::billing::Subscription;
use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, TrainerId};
use crate::ports::{PlanRepository, SubscriptionRepository};

/// In-memory implementation of the SubscriptionRepository port.
///
/// Holds a plan repository reference so trainer-scoped listing can
/// resolve plan ownership, mirroring the join the SQL adapter performs.
pub struct InMemorySubscriptionRepository {
    subscriptions: Mutex<Vec<Subscription>>,
    plans: Arc<dyn PlanRepository>,
}

impl InMemorySubscriptionRepository {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
            plans,
        }
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        self.subscriptions
            .lock()
            .unwrap()
            .push(subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions.iter_mut().find(|s| s.id == subscription.id) {
            Some(existing) => {
                *existing = subscription.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription not found: {}", subscription.id),
            )
            .with_detail("id", subscription.id.to_string())),
        }
    }

    async fn find_by_id(
        &self,
        id: &SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| &s.id == id)
            .cloned())
    }

    async fn list_by_trainer(
        &self,
        trainer_id: &TrainerId,
    ) -> Result<Vec<Subscription>, DomainError> {
        let owned_plans = self.plans.list_by_owner(trainer_id).await?;
        let mut subscriptions: Vec<Subscription> = self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| owned_plans.iter().any(|p| p.id == s.plan_id))
            .cloned()
            .collect();
        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(subscriptions)
    }

    async fn delete(&self, id: &SubscriptionId) -> Result<(), DomainError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let before = subscriptions.len();
        subscriptions.retain(|s| &s.id != id);
        if subscriptions.len() == before {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription not found: {}", id),
            )
            .with_detail("id", id.to_string()));
        }
        Ok(())
    }
}

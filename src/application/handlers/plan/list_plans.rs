//! ListPlansHandler - Query handler for a trainer's plans.

use std::sync::Arc;

use crate::domain::billing::{BillingError, PaymentPlan};
use crate::domain::foundation::TrainerId;
use crate::ports::PlanRepository;

/// Query for all plans owned by a trainer.
#[derive(Debug, Clone)]
pub struct ListPlansQuery {
    pub trainer_id: TrainerId,
}

pub struct ListPlansHandler {
    plans: Arc<dyn PlanRepository>,
}

impl ListPlansHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, query: ListPlansQuery) -> Result<Vec<PaymentPlan>, BillingError> {
        Ok(self.plans.list_by_owner(&query.trainer_id).await?)
    }
}

//! Billing domain: plans, subscriptions, payments, and statistics.

mod errors;
mod payment;
mod plan;
mod schedule;
mod stats;
mod subscription;

pub use errors::BillingError;
pub use payment::{classify, Payment, PaymentStatus, PaymentUpdate};
pub use plan::{PaymentPlan, PlanUpdate};
pub use schedule::next_scheduled_dates;
pub use stats::{
    compute as compute_statistics, BillingStatistics, PaymentSummary, DASHBOARD_LIST_CAP,
    UPCOMING_WINDOW_DAYS,
};
pub use subscription::{Subscription, SubscriptionUpdate};

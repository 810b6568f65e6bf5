//! Subscription ledger handlers.

mod create_subscription;
mod delete_subscription;
mod get_subscription;
mod list_subscriptions;
mod toggle_subscription;
mod update_subscription;

pub use create_subscription::{CreateSubscriptionCommand, CreateSubscriptionHandler};
pub use delete_subscription::{DeleteSubscriptionCommand, DeleteSubscriptionHandler};
pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery, SubscriptionView};
pub use list_subscriptions::{ListSubscriptionsHandler, ListSubscriptionsQuery};
pub use toggle_subscription::{ToggleSubscriptionCommand, ToggleSubscriptionHandler};
pub use update_subscription::{UpdateSubscriptionCommand, UpdateSubscriptionHandler};

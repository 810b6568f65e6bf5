//! Payment scheduling, lifecycle, and statistics handlers.

mod cancel_payment;
mod create_payment;
mod delete_payment;
mod generate_payments;
mod get_billing_stats;
mod list_payments;
mod mark_payment_paid;
mod sweep_overdue;
mod update_payment;

pub use cancel_payment::{CancelPaymentCommand, CancelPaymentHandler};
pub use create_payment::{CreatePaymentCommand, CreatePaymentHandler};
pub use delete_payment::{DeletePaymentCommand, DeletePaymentHandler};
pub use generate_payments::{GeneratePaymentsCommand, GeneratePaymentsHandler};
pub use get_billing_stats::{GetBillingStatsHandler, GetBillingStatsQuery};
pub use list_payments::{ListPaymentsHandler, ListPaymentsQuery};
pub use mark_payment_paid::{MarkPaymentPaidCommand, MarkPaymentPaidHandler};
pub use sweep_overdue::{SweepOverdueCommand, SweepOverdueHandler};
pub use update_payment::{UpdatePaymentCommand, UpdatePaymentHandler};

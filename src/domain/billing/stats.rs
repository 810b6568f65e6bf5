//! Dashboard statistics shapes and aggregation.
//!
//! The read side summarizes a set of payments into counts and short
//! lists for the trainer dashboard. `compute` is the reference
//! aggregation; SQL-backed readers reproduce the same shape in queries.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::payment::{Payment, PaymentStatus};
use crate::domain::foundation::{Money, PaymentId, SubscriptionId};

/// Days ahead that count as "upcoming" on the dashboard.
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

/// Maximum entries in the upcoming and overdue dashboard lists.
pub const DASHBOARD_LIST_CAP: usize = 5;

/// One payment line on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub payment_id: PaymentId,
    pub subscription_id: SubscriptionId,
    pub scheduled_date: NaiveDate,
    pub amount: Money,
}

impl From<&Payment> for PaymentSummary {
    fn from(payment: &Payment) -> Self {
        Self {
            payment_id: payment.id,
            subscription_id: payment.subscription_id,
            scheduled_date: payment.scheduled_date,
            amount: payment.amount,
        }
    }
}

/// Billing statistics for a trainer (or a single subscription).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingStatistics {
    /// Number of payments awaiting their scheduled date.
    pub pending_count: i64,

    /// Number of payments past their scheduled date without settlement.
    pub overdue_count: i64,

    /// Pending payments due within the next week, ascending, capped.
    pub upcoming: Vec<PaymentSummary>,

    /// Overdue payments, ascending by scheduled date, capped.
    pub overdue: Vec<PaymentSummary>,
}

impl BillingStatistics {
    /// Statistics over an empty payment universe.
    pub fn empty() -> Self {
        Self {
            pending_count: 0,
            overdue_count: 0,
            upcoming: Vec::new(),
            overdue: Vec::new(),
        }
    }
}

/// Aggregates payments into dashboard statistics.
///
/// Assumes the overdue sweep already ran, so statuses are current.
/// Upcoming is the half-open window (today, today + 7 days].
pub fn compute(payments: &[Payment], today: NaiveDate) -> BillingStatistics {
    let window_end = today
        .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let pending_count = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Pending)
        .count() as i64;
    let overdue_count = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Overdue)
        .count() as i64;

    let mut upcoming: Vec<&Payment> = payments
        .iter()
        .filter(|p| {
            p.status == PaymentStatus::Pending
                && p.scheduled_date > today
                && p.scheduled_date <= window_end
        })
        .collect();
    upcoming.sort_by_key(|p| p.scheduled_date);

    let mut overdue: Vec<&Payment> = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Overdue)
        .collect();
    overdue.sort_by_key(|p| p.scheduled_date);

    BillingStatistics {
        pending_count,
        overdue_count,
        upcoming: upcoming
            .into_iter()
            .take(DASHBOARD_LIST_CAP)
            .map(PaymentSummary::from)
            .collect(),
        overdue: overdue
            .into_iter()
            .take(DASHBOARD_LIST_CAP)
            .map(PaymentSummary::from)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Money, PaymentId, SubscriptionId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(scheduled: NaiveDate, status: PaymentStatus) -> Payment {
        let mut p = Payment::new_pending(
            PaymentId::new(),
            SubscriptionId::new(),
            scheduled,
            Money::from_cents(5000).unwrap(),
        );
        match status {
            PaymentStatus::Pending => {}
            PaymentStatus::Overdue => p.mark_overdue().unwrap(),
            PaymentStatus::Paid => p.mark_paid(scheduled, None).unwrap(),
            PaymentStatus::Cancelled => p.cancel().unwrap(),
        }
        p
    }

    #[test]
    fn empty_universe_yields_zeroes() {
        let stats = compute(&[], date(2024, 3, 1));
        assert_eq!(stats, BillingStatistics::empty());
    }

    #[test]
    fn counts_split_by_status() {
        let today = date(2024, 3, 1);
        let payments = vec![
            payment(date(2024, 3, 10), PaymentStatus::Pending),
            payment(date(2024, 3, 20), PaymentStatus::Pending),
            payment(date(2024, 2, 1), PaymentStatus::Overdue),
            payment(date(2024, 2, 15), PaymentStatus::Paid),
            payment(date(2024, 2, 20), PaymentStatus::Cancelled),
        ];

        let stats = compute(&payments, today);
        assert_eq!(stats.pending_count, 2);
        assert_eq!(stats.overdue_count, 1);
    }

    #[test]
    fn upcoming_window_excludes_today_and_includes_day_seven() {
        let today = date(2024, 3, 1);
        let payments = vec![
            payment(date(2024, 3, 1), PaymentStatus::Pending), // today: excluded
            payment(date(2024, 3, 2), PaymentStatus::Pending),
            payment(date(2024, 3, 8), PaymentStatus::Pending), // day 7: included
            payment(date(2024, 3, 9), PaymentStatus::Pending), // day 8: excluded
        ];

        let stats = compute(&payments, today);
        let dates: Vec<NaiveDate> =
            stats.upcoming.iter().map(|s| s.scheduled_date).collect();
        assert_eq!(dates, vec![date(2024, 3, 2), date(2024, 3, 8)]);
    }

    #[test]
    fn lists_are_capped_at_five_ascending() {
        let today = date(2024, 3, 1);
        let payments: Vec<Payment> = (2..=8)
            .map(|d| payment(date(2024, 3, d), PaymentStatus::Pending))
            .rev()
            .collect();

        let stats = compute(&payments, today);
        assert_eq!(stats.pending_count, 7);
        assert_eq!(stats.upcoming.len(), DASHBOARD_LIST_CAP);
        assert_eq!(stats.upcoming[0].scheduled_date, date(2024, 3, 2));
        assert!(stats
            .upcoming
            .windows(2)
            .all(|w| w[0].scheduled_date <= w[1].scheduled_date));
    }

    #[test]
    fn overdue_list_sorted_and_capped() {
        let today = date(2024, 3, 1);
        let payments: Vec<Payment> = (1..=7)
            .map(|d| payment(date(2024, 2, d), PaymentStatus::Overdue))
            .rev()
            .collect();

        let stats = compute(&payments, today);
        assert_eq!(stats.overdue_count, 7);
        assert_eq!(stats.overdue.len(), DASHBOARD_LIST_CAP);
        assert_eq!(stats.overdue[0].scheduled_date, date(2024, 2, 1));
    }

    #[test]
    fn upcoming_ignores_overdue_and_paid_rows() {
        let today = date(2024, 3, 1);
        let mut overdue = payment(date(2024, 3, 3), PaymentStatus::Pending);
        overdue.mark_overdue().unwrap();
        let payments = vec![
            overdue,
            payment(date(2024, 3, 3), PaymentStatus::Paid),
            payment(date(2024, 3, 3), PaymentStatus::Pending),
        ];

        let stats = compute(&payments, today);
        assert_eq!(stats.upcoming.len(), 1);
    }
}

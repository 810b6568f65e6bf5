//! Pure payment schedule computation.
//!
//! Generating payments is date arithmetic over the subscription start
//! date and the plan interval. Keeping it pure means the scheduling
//! rules are tested without touching persistence.

use chrono::{Days, NaiveDate};

use crate::domain::foundation::ValidationError;

/// Computes the scheduled dates for the next `count` payments.
///
/// The anchor is the latest already-scheduled date when the subscription
/// has payments, otherwise the subscription start date. With an anchor
/// from an existing payment the new dates continue after it; without
/// one the first payment lands on the start date itself.
///
/// # Errors
///
/// Returns `ValidationError` when `count` is zero or the interval is not
/// positive.
pub fn next_scheduled_dates(
    start_date: NaiveDate,
    latest_scheduled: Option<NaiveDate>,
    interval_days: i32,
    count: u32,
) -> Result<Vec<NaiveDate>, ValidationError> {
    if count == 0 {
        return Err(ValidationError::not_positive("count", 0));
    }
    if interval_days <= 0 {
        return Err(ValidationError::not_positive(
            "billing_interval_days",
            interval_days as i64,
        ));
    }
    let step = Days::new(interval_days as u64);

    let mut dates = Vec::with_capacity(count as usize);
    match latest_scheduled {
        Some(anchor) => {
            let mut next = add_step(anchor, step)?;
            for _ in 0..count {
                dates.push(next);
                next = add_step(next, step)?;
            }
        }
        None => {
            let mut next = start_date;
            for _ in 0..count {
                dates.push(next);
                next = add_step(next, step)?;
            }
        }
    }
    Ok(dates)
}

fn add_step(date: NaiveDate, step: Days) -> Result<NaiveDate, ValidationError> {
    date.checked_add_days(step).ok_or_else(|| {
        ValidationError::invalid_format("scheduled_date", "date arithmetic overflow")
    })
}

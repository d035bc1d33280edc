//! Late-fee estimation
//!
//! The local estimate is advisory: it lets the user see a likely charge while
//! picking a return date. Once the backend has confirmed figures for a date,
//! those replace the estimate via [`confirmed`].

use chrono::NaiveDate;
use rentdesk_core::{AffordabilityDecision, Usd};
use serde::Serialize;

/// Per-day late charge assumed when nothing else is known
pub const DEFAULT_DAILY_RATE: Usd = Usd::from_cents(1500);

/// Where a set of fee figures came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeSource {
    /// Computed on this side; may disagree with the backend
    Local,
    /// Reported by the backend's affordability check
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LateFeeEstimate {
    pub is_late: bool,
    pub days_late: u32,
    pub daily_rate: Usd,
    pub fee_amount: Usd,
    pub source: FeeSource,
}

impl LateFeeEstimate {
    fn on_time(daily_rate: Usd, source: FeeSource) -> Self {
        Self {
            is_late: false,
            days_late: 0,
            daily_rate,
            fee_amount: Usd::ZERO,
            source,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.source == FeeSource::Confirmed
    }
}

/// Whole days between the expected and the candidate return date, floored at zero
pub fn days_late(expected_return: NaiveDate, candidate_return: NaiveDate) -> u32 {
    let days = candidate_return
        .signed_duration_since(expected_return)
        .num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Estimate the late fee for returning on `candidate_return`
///
/// Dates carry no time of day, so the comparison is by calendar date only.
/// Returning before the rental started is a validation problem for the
/// caller, not something this function checks.
pub fn estimate(
    expected_return: NaiveDate,
    candidate_return: NaiveDate,
    daily_rate: Usd,
) -> LateFeeEstimate {
    let days = days_late(expected_return, candidate_return);
    if days == 0 {
        return LateFeeEstimate::on_time(daily_rate, FeeSource::Local);
    }

    LateFeeEstimate {
        is_late: true,
        days_late: days,
        daily_rate,
        fee_amount: daily_rate * days,
        source: FeeSource::Local,
    }
}

/// Fee figures as the backend reported them
///
/// The daily rate is not part of the backend's answer, so it is derived as
/// `late_fees / days_late` when late and falls back to `fallback_rate`.
pub fn confirmed(decision: &AffordabilityDecision, fallback_rate: Usd) -> LateFeeEstimate {
    if !decision.is_late && !decision.late_fees.is_positive() {
        return LateFeeEstimate::on_time(fallback_rate, FeeSource::Confirmed);
    }

    LateFeeEstimate {
        is_late: true,
        days_late: decision.days_late,
        daily_rate: decision.late_fees.per_unit(decision.days_late).unwrap_or(fallback_rate),
        fee_amount: decision.late_fees,
        source: FeeSource::Confirmed,
    }
}

//! Return workflow states

use chrono::NaiveDate;
use rentdesk_core::{Error, ErrorKind, ReturnReceipt, Usd};
use std::fmt;

pub const DEFAULT_RETURN_NOTES: &str = "Vehicle returned in good condition";

/// What the user has entered so far
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnForm {
    pub return_date: NaiveDate,
    pub notes: String,
}

impl ReturnForm {
    pub fn new(return_date: NaiveDate, notes: impl Into<String>) -> Self {
        Self {
            return_date,
            notes: notes.into(),
        }
    }
}

/// A problem to show the user
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl ReturnFailure {
    /// Only a fresh sign-in recovers from this
    pub fn requires_sign_in(&self) -> bool {
        self.kind == ErrorKind::AuthExpired
    }
}

impl From<&Error> for ReturnFailure {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ReturnFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Figures reported by the backend for a completed return
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnOutcome {
    pub rental_id: i64,
    pub final_amount: Option<Usd>,
    pub new_balance: Option<Usd>,
    pub message: Option<String>,
}

impl ReturnOutcome {
    pub fn from_receipt(rental_id: i64, receipt: ReturnReceipt) -> Self {
        Self {
            rental_id,
            final_amount: receipt.final_amount,
            new_balance: receipt.new_balance,
            message: receipt.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReturnState {
    Idle,
    LoadingRental,
    /// Waiting for the user; `notice` carries the last recoverable problem
    Ready {
        notice: Option<ReturnFailure>,
    },
    Validating,
    CheckingAffordability,
    Submitting,
    Succeeded(ReturnOutcome),
    Failed(ReturnFailure),
}

impl ReturnState {
    pub fn name(&self) -> &'static str {
        match self {
            ReturnState::Idle => "idle",
            ReturnState::LoadingRental => "loading-rental",
            ReturnState::Ready { .. } => "ready",
            ReturnState::Validating => "validating",
            ReturnState::CheckingAffordability => "checking-affordability",
            ReturnState::Submitting => "submitting",
            ReturnState::Succeeded(_) => "succeeded",
            ReturnState::Failed(_) => "failed",
        }
    }

    /// A request is in flight
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ReturnState::LoadingRental
                | ReturnState::Validating
                | ReturnState::CheckingAffordability
                | ReturnState::Submitting
        )
    }

    pub fn accepts_submit(&self) -> bool {
        matches!(self, ReturnState::Ready { .. })
    }

    /// Where dismissing a terminal state leads
    ///
    /// `Succeeded` always starts over. `Failed` goes back to `Ready` when a
    /// rental is still loaded and the session is usable; otherwise it starts
    /// over. Non-terminal states cannot be dismissed.
    pub fn dismissed(&self, rental_loaded: bool) -> Option<ReturnState> {
        match self {
            ReturnState::Succeeded(_) => Some(ReturnState::Idle),
            ReturnState::Failed(failure) if rental_loaded && !failure.requires_sign_in() => {
                Some(ReturnState::Ready { notice: None })
            }
            ReturnState::Failed(_) => Some(ReturnState::Idle),
            _ => None,
        }
    }
}

impl fmt::Display for ReturnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

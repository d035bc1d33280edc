//! Vehicle return workflow
//!
//! ```text
//! Idle -> LoadingRental -> Ready -> Validating -> CheckingAffordability -> Submitting
//!                            ^          |                  |                  |
//!                            +----------+------------------+        Succeeded | Failed
//! ```
//!
//! Local validation problems and affordability refusals drop back to `Ready`
//! with a notice and the user's input intact. Submission problems end in
//! `Failed`, which the user dismisses.

mod controller;
mod state;

pub use controller::{ReturnView, ReturnWorkflow, WorkflowConfig};
pub use state::{ReturnFailure, ReturnForm, ReturnOutcome, ReturnState, DEFAULT_RETURN_NOTES};

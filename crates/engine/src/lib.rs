//! Rentdesk Engine - Late fees, returns, bookings and payments

pub mod affordability;
pub mod backend;
pub mod booking;
pub mod fees;
pub mod payments;
pub mod workflow;

pub use affordability::{check_affordability, AffordabilityReport};
pub use backend::RentalBackend;
pub use booking::{book_vehicle, booking_request};
pub use fees::{estimate, FeeSource, LateFeeEstimate, DEFAULT_DAILY_RATE};
pub use workflow::{ReturnFailure, ReturnOutcome, ReturnState, ReturnView, ReturnWorkflow, WorkflowConfig};

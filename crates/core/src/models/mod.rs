//! Data models for rental backend entities

mod account;
mod balance;
mod booking;
mod envelope;
mod fleet;
mod history;
mod late_fee;
mod rental;
mod user;

pub use account::*;
pub use balance::*;
pub use booking::*;
pub use envelope::*;
pub use fleet::*;
pub use history::*;
pub use late_fee::*;
pub use rental::*;
pub use user::*;

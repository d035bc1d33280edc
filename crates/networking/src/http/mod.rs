//! HTTP transport for the rental backend

mod client;

pub use client::RentalClient;

//! The backend operations the engine depends on
//!
//! [`RentalClient`] is the production implementation; tests substitute an
//! in-process fake.

use chrono::NaiveDate;
use rentdesk_core::{
    ActiveRentalResponse, AffordabilityDecision, BalanceChange, BalanceChangeRequest,
    BookingReceipt, BookingRequest, FleetPage, LateFee, LateFeePaymentRequest, Result,
    ReturnReceipt, ReturnRequest, Usd,
};
use rentdesk_networking::RentalClient;

#[allow(async_fn_in_trait)]
pub trait RentalBackend {
    async fn active_rental(&self) -> Result<ActiveRentalResponse>;

    async fn balance(&self) -> Result<Usd>;

    async fn check_return(
        &self,
        rental_id: i64,
        return_date: NaiveDate,
    ) -> Result<AffordabilityDecision>;

    async fn submit_return(&self, request: &ReturnRequest) -> Result<ReturnReceipt>;

    async fn late_fees(&self) -> Result<Vec<LateFee>>;

    /// Returns the balance left after the payment
    async fn pay_late_fee(&self, request: &LateFeePaymentRequest) -> Result<Usd>;

    async fn add_balance(&self, request: &BalanceChangeRequest) -> Result<BalanceChange>;

    async fn debit_balance(&self, request: &BalanceChangeRequest) -> Result<BalanceChange>;

    /// `page` is zero-based
    async fn available_fleet(&self, page: u32, size: u32) -> Result<FleetPage>;

    async fn rent(&self, request: &BookingRequest) -> Result<BookingReceipt>;
}

impl RentalBackend for RentalClient {
    async fn active_rental(&self) -> Result<ActiveRentalResponse> {
        RentalClient::active_rental(self).await
    }

    async fn balance(&self) -> Result<Usd> {
        RentalClient::balance(self).await
    }

    async fn check_return(
        &self,
        rental_id: i64,
        return_date: NaiveDate,
    ) -> Result<AffordabilityDecision> {
        RentalClient::check_return(self, rental_id, return_date).await
    }

    async fn submit_return(&self, request: &ReturnRequest) -> Result<ReturnReceipt> {
        RentalClient::submit_return(self, request).await
    }

    async fn late_fees(&self) -> Result<Vec<LateFee>> {
        RentalClient::late_fees(self).await
    }

    async fn pay_late_fee(&self, request: &LateFeePaymentRequest) -> Result<Usd> {
        RentalClient::pay_late_fee(self, request).await
    }

    async fn add_balance(&self, request: &BalanceChangeRequest) -> Result<BalanceChange> {
        RentalClient::add_balance(self, request).await
    }

    async fn debit_balance(&self, request: &BalanceChangeRequest) -> Result<BalanceChange> {
        RentalClient::debit_balance(self, request).await
    }

    async fn available_fleet(&self, page: u32, size: u32) -> Result<FleetPage> {
        RentalClient::available_fleet(self, page, size).await
    }

    async fn rent(&self, request: &BookingRequest) -> Result<BookingReceipt> {
        RentalClient::rent(self, request).await
    }
}

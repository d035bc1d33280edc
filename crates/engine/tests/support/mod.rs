#![allow(dead_code)]

use chrono::NaiveDate;
use rentdesk_core::{
    ActiveRentalResponse, AffordabilityDecision, BalanceChange, BalanceChangeRequest,
    BookingReceipt, BookingRequest, Error, FleetPage, LateFee, LateFeePaymentRequest, Rental,
    RentalStatus, Result, ReturnReceipt, ReturnRequest, Usd, Vehicle,
};
use rentdesk_engine::RentalBackend;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Barrier, Notify};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn usd(cents: i64) -> Usd {
    Usd::from_cents(cents)
}

/// Rental 42, 2024-01-05 to 2024-01-10
pub fn rental() -> Rental {
    Rental {
        rental_id: 42,
        vehicle_id: 3,
        vehicle_name: "Toyota Corolla".to_string(),
        vehicle_type: "Sedan".to_string(),
        start_date: date(2024, 1, 5),
        end_date: date(2024, 1, 10),
        total_cost: usd(30000),
        status: RentalStatus::Active,
        additional_notes: None,
    }
}

pub fn decision(can_return: bool, days_late: u32, late_fees: Usd, message: Option<&str>) -> AffordabilityDecision {
    AffordabilityDecision {
        can_return,
        message: message.map(str::to_string),
        is_late: days_late > 0,
        days_late,
        late_fees,
    }
}

pub fn receipt(final_amount: Usd, new_balance: Usd) -> ReturnReceipt {
    ReturnReceipt {
        final_amount: Some(final_amount),
        new_balance: Some(new_balance),
        message: Some("Vehicle returned successfully".to_string()),
    }
}

/// A listed vehicle with the given id
pub fn vehicle(id: i64, name: &str) -> Vehicle {
    Vehicle {
        id: None,
        vehicle_id: Some(id),
        name: Some(name.to_string()),
        make: None,
        model: None,
        year: None,
        vehicle_type: Some("Sedan".to_string()),
        category: None,
        price: Some(usd(4500)),
        rental_cost_per_day: None,
        description: None,
        features: None,
        vehicle_image_url: None,
        status: Some("AVAILABLE".to_string()),
    }
}

/// Split `vehicles` into pages of `size`
pub fn fleet_pages(vehicles: Vec<Vehicle>, size: usize) -> Vec<FleetPage> {
    let total_items = vehicles.len() as u64;
    let chunks: Vec<Vec<Vehicle>> = vehicles.chunks(size).map(<[Vehicle]>::to_vec).collect();
    let total_pages = chunks.len() as u32;
    chunks
        .into_iter()
        .enumerate()
        .map(|(page, vehicles)| FleetPage {
            page: page as u32,
            vehicles,
            total_pages,
            total_items,
        })
        .collect()
}

/// Scripted backend that records every call
pub struct FakeBackend {
    rental: Mutex<Result<ActiveRentalResponse>>,
    /// Consumed front to back; the last entry repeats
    balances: Mutex<Vec<Result<Usd>>>,
    decision: Mutex<Result<AffordabilityDecision>>,
    receipt: Mutex<Result<ReturnReceipt>>,
    late_fees: Mutex<Vec<LateFee>>,
    submit_gate: Mutex<Option<Arc<Notify>>>,
    submit_delay: Mutex<Option<Duration>>,
    load_barrier: Mutex<Option<Arc<Barrier>>>,
    fleet: Mutex<Vec<FleetPage>>,
    booking: Mutex<Result<BookingReceipt>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    requests: Mutex<Vec<String>>,
}

impl FakeBackend {
    /// Rental 42 active, $100.00 balance, on-time return accepted
    pub fn new() -> Self {
        Self {
            rental: Mutex::new(Ok(ActiveRentalResponse::active(rental()))),
            balances: Mutex::new(vec![Ok(usd(10000))]),
            decision: Mutex::new(Ok(decision(true, 0, Usd::ZERO, None))),
            receipt: Mutex::new(Ok(receipt(usd(30000), usd(7000)))),
            late_fees: Mutex::new(Vec::new()),
            submit_gate: Mutex::new(None),
            submit_delay: Mutex::new(None),
            load_barrier: Mutex::new(None),
            fleet: Mutex::new(Vec::new()),
            booking: Mutex::new(Ok(BookingReceipt {
                rental_id: Some(51),
                total_cost: Some(usd(13500)),
                message: None,
            })),
            calls: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rental(self, rental: Result<ActiveRentalResponse>) -> Self {
        *self.rental.lock().unwrap() = rental;
        self
    }

    pub fn with_balances(self, balances: Vec<Result<Usd>>) -> Self {
        *self.balances.lock().unwrap() = balances;
        self
    }

    pub fn with_decision(self, decision: Result<AffordabilityDecision>) -> Self {
        *self.decision.lock().unwrap() = decision;
        self
    }

    pub fn with_receipt(self, receipt: Result<ReturnReceipt>) -> Self {
        *self.receipt.lock().unwrap() = receipt;
        self
    }

    pub fn with_late_fees(self, fees: Vec<LateFee>) -> Self {
        *self.late_fees.lock().unwrap() = fees;
        self
    }

    /// Hold `submit_return` until the gate is notified
    pub fn with_submit_gate(self, gate: Arc<Notify>) -> Self {
        *self.submit_gate.lock().unwrap() = Some(gate);
        self
    }

    pub fn with_submit_delay(self, delay: Duration) -> Self {
        *self.submit_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn with_fleet(self, pages: Vec<FleetPage>) -> Self {
        *self.fleet.lock().unwrap() = pages;
        self
    }

    pub fn with_booking(self, booking: Result<BookingReceipt>) -> Self {
        *self.booking.lock().unwrap() = booking;
        self
    }

    /// `active_rental` and `balance` both wait on a two-party barrier, so
    /// neither returns unless the other has been started too
    pub fn with_load_barrier(self) -> Self {
        *self.load_barrier.lock().unwrap() = Some(Arc::new(Barrier::new(2)));
        self
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
    }

    fn record_request(&self, body: String) {
        self.requests.lock().unwrap().push(body);
    }

    async fn wait_for_peer_fetch(&self) {
        let barrier = self.load_barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
    }
}

impl RentalBackend for FakeBackend {
    async fn active_rental(&self) -> Result<ActiveRentalResponse> {
        self.record("active_rental");
        self.wait_for_peer_fetch().await;
        self.rental.lock().unwrap().clone()
    }

    async fn balance(&self) -> Result<Usd> {
        self.record("balance");
        self.wait_for_peer_fetch().await;
        let mut balances = self.balances.lock().unwrap();
        if balances.len() > 1 {
            balances.remove(0)
        } else {
            balances
                .first()
                .cloned()
                .unwrap_or(Err(Error::InvalidData("no balance scripted".to_string())))
        }
    }

    async fn check_return(&self, _rental_id: i64, _return_date: NaiveDate) -> Result<AffordabilityDecision> {
        self.record("check_return");
        self.decision.lock().unwrap().clone()
    }

    async fn submit_return(&self, request: &ReturnRequest) -> Result<ReturnReceipt> {
        self.record("submit_return");
        self.record_request(serde_json::to_string(request).unwrap());

        let gate = self.submit_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let delay = *self.submit_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.receipt.lock().unwrap().clone()
    }

    async fn late_fees(&self) -> Result<Vec<LateFee>> {
        self.record("late_fees");
        Ok(self.late_fees.lock().unwrap().clone())
    }

    async fn pay_late_fee(&self, request: &LateFeePaymentRequest) -> Result<Usd> {
        self.record("pay_late_fee");
        self.record_request(serde_json::to_string(request).unwrap());
        Ok(usd(5000))
    }

    async fn add_balance(&self, request: &BalanceChangeRequest) -> Result<BalanceChange> {
        self.record("add_balance");
        self.record_request(serde_json::to_string(request).unwrap());
        Ok(BalanceChange {
            message: Some("Balance added".to_string()),
            new_balance: usd(10000) + request.amount,
            added_amount: Some(request.amount),
        })
    }

    async fn debit_balance(&self, request: &BalanceChangeRequest) -> Result<BalanceChange> {
        self.record("debit_balance");
        self.record_request(serde_json::to_string(request).unwrap());
        Ok(BalanceChange {
            message: Some("Balance debited".to_string()),
            new_balance: usd(10000) - request.amount,
            added_amount: Some(request.amount),
        })
    }

    async fn available_fleet(&self, page: u32, _size: u32) -> Result<FleetPage> {
        self.record("available_fleet");
        let pages = self.fleet.lock().unwrap();
        Ok(pages.get(page as usize).cloned().unwrap_or(FleetPage {
            page,
            vehicles: Vec::new(),
            total_pages: pages.len() as u32,
            total_items: 0,
        }))
    }

    async fn rent(&self, request: &BookingRequest) -> Result<BookingReceipt> {
        self.record("rent");
        self.record_request(serde_json::to_string(request).unwrap());
        self.booking.lock().unwrap().clone()
    }
}

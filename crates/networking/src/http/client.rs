//! Rental backend HTTP client with bearer-token authentication

use crate::config::ClientConfig;
use crate::session::Session;
use chrono::NaiveDate;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, RequestBuilder, Response,
};
use rentdesk_core::{
    ActiveRentalResponse, AffordabilityDecision, AffordabilityRequest, BalanceChange,
    BalanceChangeRequest, BalanceResponse, BookingReceipt, BookingRequest, Envelope, Error,
    ErrorBody, FleetPage, FleetResponse, LateFee, LateFeePaymentReceipt, LateFeePaymentRequest,
    LoginRequest, LoginResponse, LogoutRequest, ProfileUpdate, RentalHistoryResponse,
    RentalRecord, Result, ReturnReceipt, ReturnRequest, SignupRequest, SignupResponse,
    TokenVerification, Usd, VerifyTokenResponse,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

const USER_AGENT_VALUE: &str = concat!("rentdesk/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the vehicle-rental backend
///
/// Reads the bearer token from the shared [`Session`] on every request, so
/// signing in or out takes effect immediately for all holders of the client.
/// Requests are bounded by the configured timeout and never retried.
pub struct RentalClient {
    http: Client,
    config: ClientConfig,
    session: Arc<Session>,
}

impl RentalClient {
    pub fn new(config: ClientConfig, session: Arc<Session>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn bearer(&self) -> Result<String> {
        self.session.token().ok_or(Error::NotAuthenticated)
    }

    fn get(&self, path: &str) -> Result<RequestBuilder> {
        let token = self.bearer()?;
        Ok(self.http.get(self.config.endpoint(path)).bearer_auth(token))
    }

    fn post(&self, path: &str) -> Result<RequestBuilder> {
        let token = self.bearer()?;
        Ok(self.http.post(self.config.endpoint(path)).bearer_auth(token))
    }

    fn put(&self, path: &str) -> Result<RequestBuilder> {
        let token = self.bearer()?;
        Ok(self.http.put(self.config.endpoint(path)).bearer_auth(token))
    }

    async fn send(request: RequestBuilder, what: &str) -> Result<Response> {
        request.send().await.map_err(|e| {
            error!("{} request failed: {}", what, e);
            Error::from(e)
        })
    }

    /// Map non-2xx statuses to errors, keeping the backend's text verbatim
    async fn check_status(response: Response, fallback: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let body = ErrorBody::parse(&raw);
        error!("Request failed: HTTP {} ({})", status, body.text().unwrap_or("no details"));

        match status.as_u16() {
            401 => Err(Error::TokenExpired),
            403 => Err(Error::AccessDenied(
                body.text().unwrap_or("Access denied (403 Forbidden)").to_string(),
            )),
            code => Err(Error::ApiError {
                status: code,
                message: body
                    .text()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} (Status: {})", fallback, code)),
            }),
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let body = response.text().await.map_err(|e| {
            error!("Failed to read {} response body: {}", what, e);
            Error::from(e)
        })?;

        serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse {} response: {}. Body preview: {}",
                what,
                e,
                body.chars().take(200).collect::<String>()
            );
            Error::InvalidData(e.to_string())
        })
    }

    /// Exchange credentials for a token
    ///
    /// Unlike every other call, a 401 here means bad credentials, not an
    /// expired session.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = self.http.post(self.config.endpoint("/login")).json(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        });

        let response = Self::send(request, "Login").await?;
        let status = response.status();
        if matches!(status.as_u16(), 400 | 401) {
            let body = ErrorBody::parse(&response.text().await.unwrap_or_default());
            return Err(Error::Rejected(
                body.text().unwrap_or("Sign in failed").to_string(),
            ));
        }

        let response = Self::check_status(response, "Sign in failed").await?;
        let login: LoginResponse = Self::parse(response, "login").await?;
        debug!("Signed in as {}", username);
        Ok(login)
    }

    /// Ask the backend whether `token` is valid; any failure counts as invalid
    #[instrument(skip(self, token))]
    pub async fn verify_token(&self, token: &str) -> TokenVerification {
        let request = self
            .http
            .post(self.config.endpoint("/verify-token"))
            .bearer_auth(token);

        let response = match Self::send(request, "Verify token").await {
            Ok(r) => r,
            Err(_) => return TokenVerification::invalid(),
        };

        if !response.status().is_success() {
            debug!("Token rejected: HTTP {}", response.status());
            return TokenVerification::invalid();
        }

        match Self::parse::<VerifyTokenResponse>(response, "verify token").await {
            Ok(body) => TokenVerification {
                valid: true,
                user: body.user,
            },
            Err(_) => TokenVerification::invalid(),
        }
    }

    /// Tell the backend to invalidate the current token
    #[instrument(skip(self, body))]
    pub async fn logout(&self, body: &LogoutRequest) -> Result<()> {
        let request = self.post("/logout")?.json(body);
        let response = Self::send(request, "Logout").await?;
        Self::check_status(response, "Logout failed").await?;
        Ok(())
    }

    /// Fetch the caller's single active rental
    #[instrument(skip(self))]
    pub async fn active_rental(&self) -> Result<ActiveRentalResponse> {
        let response = Self::send(self.get("/rentals/active")?, "Active rental").await?;
        let response = Self::check_status(response, "Failed to load rental details").await?;
        let active: ActiveRentalResponse = Self::parse(response, "active rental").await?;

        debug!(
            "Active rental: {}",
            active
                .data
                .as_ref()
                .map(|r| r.rental_id.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        Ok(active)
    }

    /// Fetch the caller's current balance
    #[instrument(skip(self))]
    pub async fn balance(&self) -> Result<Usd> {
        let response = Self::send(self.get("/balance")?, "Balance").await?;
        let response = Self::check_status(response, "Failed to fetch balance").await?;
        let body: BalanceResponse = Self::parse(response, "balance").await?;

        let balance = body
            .amount()
            .ok_or_else(|| Error::InvalidData("Invalid balance response format".to_string()))?;
        debug!("Balance fetched: {}", balance);
        Ok(balance)
    }

    /// Ask the backend whether `rental_id` can be returned on `return_date`
    #[instrument(skip(self))]
    pub async fn check_return(
        &self,
        rental_id: i64,
        return_date: NaiveDate,
    ) -> Result<AffordabilityDecision> {
        let path = format!("/rentals/{}/check-return", rental_id);
        let request = self.post(&path)?.json(&AffordabilityRequest { return_date });

        let response = Self::send(request, "Check return").await?;
        let response =
            Self::check_status(response, "Failed to check return affordability").await?;
        let envelope: Envelope<AffordabilityDecision> =
            Self::parse(response, "check return").await?;

        if envelope.is_rejected() {
            return Err(Error::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Failed to check affordability".to_string()),
            ));
        }

        let decision = envelope.data.ok_or_else(|| {
            Error::InvalidData("affordability response has no data".to_string())
        })?;
        debug!(
            "Return check for rental {}: canReturn={}, daysLate={}, lateFees={}",
            rental_id, decision.can_return, decision.days_late, decision.late_fees
        );
        Ok(decision)
    }

    /// Submit the vehicle return
    #[instrument(skip(self))]
    pub async fn submit_return(&self, request: &ReturnRequest) -> Result<ReturnReceipt> {
        let builder = self.post("/rentals/return")?.json(request);

        let response = Self::send(builder, "Return vehicle").await?;
        let response = Self::check_status(response, "Failed to return vehicle").await?;
        let envelope: Envelope<ReturnReceipt> = Self::parse(response, "return vehicle").await?;

        if envelope.is_rejected() {
            return Err(Error::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Failed to return vehicle".to_string()),
            ));
        }

        let mut receipt = envelope.data.unwrap_or_default();
        if receipt.message.is_none() {
            receipt.message = envelope.message;
        }
        debug!(
            "Rental {} returned, final amount {:?}",
            request.rental_id, receipt.final_amount
        );
        Ok(receipt)
    }

    /// List the caller's late fees
    #[instrument(skip(self))]
    pub async fn late_fees(&self) -> Result<Vec<LateFee>> {
        let response = Self::send(self.get("/late-fees/user")?, "Late fees").await?;
        let response = Self::check_status(response, "Failed to fetch late fees").await?;
        let envelope: Envelope<Vec<LateFee>> = Self::parse(response, "late fees").await?;

        if envelope.is_rejected() {
            return Err(Error::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Failed to fetch late fees".to_string()),
            ));
        }

        let fees = envelope.data.unwrap_or_default();
        debug!("Fetched {} late fees", fees.len());
        Ok(fees)
    }

    /// Pay a late fee, returning the new balance
    #[instrument(skip(self))]
    pub async fn pay_late_fee(&self, request: &LateFeePaymentRequest) -> Result<Usd> {
        let builder = self.post("/late-fees/pay")?.json(request);

        let response = Self::send(builder, "Pay late fee").await?;
        let response = Self::check_status(response, "Payment failed").await?;
        let envelope: Envelope<LateFeePaymentReceipt> =
            Self::parse(response, "late fee payment").await?;

        if envelope.is_rejected() {
            return Err(Error::Rejected(
                envelope.message.unwrap_or_else(|| "Payment failed".to_string()),
            ));
        }

        let receipt = envelope.data.ok_or_else(|| {
            Error::InvalidData("payment response has no new balance".to_string())
        })?;
        Ok(receipt.new_balance)
    }

    /// Credit the caller's balance
    #[instrument(skip(self))]
    pub async fn add_balance(&self, request: &BalanceChangeRequest) -> Result<BalanceChange> {
        let builder = self.post("/balance/add")?.json(request);
        let response = Self::send(builder, "Add balance").await?;
        let response = Self::check_status(response, "Failed to add balance").await?;
        Self::parse(response, "add balance").await
    }

    /// Debit the caller's balance
    #[instrument(skip(self))]
    pub async fn debit_balance(&self, request: &BalanceChangeRequest) -> Result<BalanceChange> {
        let builder = self.post("/balance/debit")?.json(request);
        let response = Self::send(builder, "Debit balance").await?;
        let response = Self::check_status(response, "Failed to debit balance").await.map_err(|e| {
            warn!("Debit rejected: {}", e);
            e
        })?;
        Self::parse(response, "debit balance").await
    }

    /// Create an account; no session is needed
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse> {
        let builder = self.http.post(self.config.endpoint("/signup")).json(request);
        let response = Self::send(builder, "Signup").await?;
        let response = Self::check_status(response, "Signup failed").await?;
        let body: SignupResponse = Self::parse(response, "signup").await?;
        debug!("Account {} created", request.username);
        Ok(body)
    }

    /// Update profile fields; absent fields are left unchanged
    #[instrument(skip(self))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Option<String>> {
        let builder = self.put("/profile")?.json(update);
        let response = Self::send(builder, "Update profile").await?;
        let response = Self::check_status(response, "Update failed").await?;
        let envelope: Envelope<serde_json::Value> = Self::parse(response, "update profile").await?;
        Ok(envelope.message)
    }

    /// Fetch one page of vehicles available to rent; `page` is zero-based
    #[instrument(skip(self))]
    pub async fn available_fleet(&self, page: u32, size: u32) -> Result<FleetPage> {
        let request = self
            .get("/fleet/available")?
            .query(&[("page", page), ("size", size)]);
        let response = Self::send(request, "Fleet").await?;
        let response = Self::check_status(response, "Failed to load fleet").await?;
        let body: FleetResponse = Self::parse(response, "fleet").await?;

        let fleet = body.into_page(page);
        debug!(
            "Fleet page {} of {}: {} vehicles",
            page + 1,
            fleet.total_pages,
            fleet.vehicles.len()
        );
        Ok(fleet)
    }

    /// Book a vehicle for the given dates
    #[instrument(skip(self))]
    pub async fn rent(&self, request: &BookingRequest) -> Result<BookingReceipt> {
        let builder = self.post("/rent")?.json(request);
        let response = Self::send(builder, "Rent vehicle").await?;
        let response =
            Self::check_status(response, "Rental failed - please try again").await?;
        let receipt: BookingReceipt = Self::parse(response, "rent vehicle").await?;
        debug!(
            "Vehicle {} booked as rental {:?}",
            request.vehicle_id, receipt.rental_id
        );
        Ok(receipt)
    }

    /// Fetch one page of the caller's rental history; `page` is zero-based
    #[instrument(skip(self))]
    pub async fn rental_history(&self, page: u32, size: u32) -> Result<Vec<RentalRecord>> {
        let request = self
            .get("/rentals/user")?
            .query(&[("page", page), ("size", size)]);
        let response = Self::send(request, "Rental history").await?;
        let response = Self::check_status(response, "Failed to load rental history").await?;
        let body: RentalHistoryResponse = Self::parse(response, "rental history").await?;

        let records = body.into_records();
        debug!("Rental history page {}: {} rentals", page, records.len());
        Ok(records)
    }
}

use super::state::{ReturnFailure, ReturnForm, ReturnOutcome, ReturnState, DEFAULT_RETURN_NOTES};
use crate::affordability::{self, AffordabilityReport};
use crate::backend::RentalBackend;
use crate::fees::{self, LateFeeEstimate, DEFAULT_DAILY_RATE};
use chrono::{Local, NaiveDate};
use rentdesk_core::{ActiveRentalResponse, Error, Rental, Result, ReturnRequest, Usd};
use rentdesk_networking::Session;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const NO_ACTIVE_RENTAL: &str = "No active rental found";
const RENTAL_MISMATCH: &str = "Rental not found or not active";

/// Tunables for a return workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    /// Rate used for the local late-fee estimate
    pub daily_rate: Usd,
    /// How long the final submission may take before it is abandoned
    pub submit_timeout: Duration,
    /// Delay between an auth failure and the forced sign-out
    pub relogin_delay: Duration,
    /// Notes pre-filled into the form
    pub default_notes: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            daily_rate: DEFAULT_DAILY_RATE,
            submit_timeout: Duration::from_secs(30),
            relogin_delay: Duration::from_secs(2),
            default_notes: DEFAULT_RETURN_NOTES.to_string(),
        }
    }
}

/// Everything a renderer needs, captured at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnView {
    pub state: ReturnState,
    pub rental: Option<Rental>,
    pub balance: Option<Usd>,
    /// Local until the backend has confirmed the figures
    pub estimate: Option<LateFeeEstimate>,
    pub affordability: Option<AffordabilityReport>,
    pub form: ReturnForm,
}

#[derive(Debug)]
struct Context {
    rental: Option<Rental>,
    balance: Option<Usd>,
    estimate: Option<LateFeeEstimate>,
    affordability: Option<AffordabilityReport>,
    form: ReturnForm,
    completed: bool,
}

impl Context {
    fn fresh(form: ReturnForm) -> Self {
        Self {
            rental: None,
            balance: None,
            estimate: None,
            affordability: None,
            form,
            completed: false,
        }
    }
}

/// Releases the single-flight flag when a submission ends, however it ends
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives the return of a single rental
///
/// State changes are published on a watch channel; call [`subscribe`] to
/// follow them. Methods take `&self` so the workflow can be shared behind an
/// `Arc` between the task submitting and the task rendering.
///
/// [`subscribe`]: ReturnWorkflow::subscribe
pub struct ReturnWorkflow<B> {
    backend: Arc<B>,
    session: Arc<Session>,
    rental_id: i64,
    config: WorkflowConfig,
    state: watch::Sender<ReturnState>,
    ctx: Mutex<Context>,
    submitting: AtomicBool,
}

impl<B: RentalBackend> ReturnWorkflow<B> {
    /// Workflow with today's date as the proposed return date
    pub fn new(backend: Arc<B>, session: Arc<Session>, rental_id: i64, config: WorkflowConfig) -> Self {
        let today = Local::now().date_naive();
        Self::with_return_date(backend, session, rental_id, config, today)
    }

    pub fn with_return_date(
        backend: Arc<B>,
        session: Arc<Session>,
        rental_id: i64,
        config: WorkflowConfig,
        return_date: NaiveDate,
    ) -> Self {
        let form = ReturnForm::new(return_date, config.default_notes.clone());
        let (state, _) = watch::channel(ReturnState::Idle);
        Self {
            backend,
            session,
            rental_id,
            config,
            state,
            ctx: Mutex::new(Context::fresh(form)),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ReturnState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReturnState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ReturnView {
        let state = self.state();
        let ctx = self.ctx();
        ReturnView {
            state,
            rental: ctx.rental.clone(),
            balance: ctx.balance,
            estimate: ctx.estimate.clone(),
            affordability: ctx.affordability.clone(),
            form: ctx.form.clone(),
        }
    }

    /// Fetch the active rental and the balance, then wait for the user
    pub async fn load(&self) -> Result<()> {
        if self.state.borrow().is_busy() {
            return Err(Error::SubmissionInFlight);
        }

        self.transition(ReturnState::LoadingRental);
        let (rental, balance) = tokio::join!(self.backend.active_rental(), self.backend.balance());

        let rental = match rental.and_then(|resp| self.select_rental(resp)) {
            Ok(rental) => rental,
            Err(e) => {
                error!("Failed to load rental {}: {}", self.rental_id, e);
                self.fail(&e);
                return Err(e);
            }
        };

        let balance = match balance {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!("Balance unavailable while loading rental {}: {}", self.rental_id, e);
                None
            }
        };

        {
            let mut ctx = self.ctx();
            ctx.estimate = Some(fees::estimate(
                rental.end_date,
                ctx.form.return_date,
                self.config.daily_rate,
            ));
            ctx.rental = Some(rental);
            ctx.balance = balance;
            ctx.affordability = None;
        }

        info!("Rental {} loaded and ready for return", self.rental_id);
        self.transition(ReturnState::Ready { notice: None });
        Ok(())
    }

    /// Change the proposed return date and recompute the local estimate
    ///
    /// Any backend-confirmed figures belong to the old date and are dropped.
    pub fn set_return_date(&self, return_date: NaiveDate) -> Option<LateFeeEstimate> {
        let mut ctx = self.ctx();
        ctx.form.return_date = return_date;
        ctx.affordability = None;
        ctx.estimate = ctx
            .rental
            .as_ref()
            .map(|rental| fees::estimate(rental.end_date, return_date, self.config.daily_rate));
        ctx.estimate.clone()
    }

    pub fn set_notes(&self, notes: impl Into<String>) {
        self.ctx().form.notes = notes.into();
    }

    /// Run validation, the affordability check and the submission
    ///
    /// A second call while one is running fails immediately with
    /// [`Error::SubmissionInFlight`] and never reaches the backend.
    pub async fn submit(&self) -> Result<ReturnOutcome> {
        let Some(_flight) = FlightGuard::acquire(&self.submitting) else {
            debug!("Ignoring duplicate submit for rental {}", self.rental_id);
            return Err(Error::SubmissionInFlight);
        };

        if self.ctx().completed {
            return Err(Error::AlreadyReturned);
        }
        let current = self.state();
        if !current.accepts_submit() {
            return Err(Error::Validation(format!(
                "Cannot submit a return while {}",
                current.name()
            )));
        }
        if !self.session.is_signed_in() {
            let e = Error::NotAuthenticated;
            warn!("No session token, refusing to submit rental {}", self.rental_id);
            self.fail(&e);
            return Err(e);
        }

        self.transition(ReturnState::Validating);
        let request = match self.validate() {
            Ok(request) => request,
            Err(e) => {
                debug!("Return form rejected locally: {}", e);
                self.bounce(&e);
                return Err(e);
            }
        };

        self.transition(ReturnState::CheckingAffordability);
        let balance = self.ctx().balance;
        let report = match affordability::check_affordability(
            self.backend.as_ref(),
            self.rental_id,
            request.return_date,
            balance,
        )
        .await
        {
            Ok(report) => report,
            Err(e) => {
                self.bounce(&e);
                return Err(e);
            }
        };

        {
            let mut ctx = self.ctx();
            ctx.estimate = Some(report.estimate(self.config.daily_rate));
            ctx.affordability = Some(report.clone());
        }
        if let Err(e) = report.permit() {
            info!("Return of rental {} refused: {}", self.rental_id, e);
            self.bounce(&e);
            return Err(e);
        }
        if let Some(short) = report.shortfall() {
            warn!(
                "Backend allowed return of rental {} although the balance is {} short",
                self.rental_id, short
            );
        }

        self.refresh_balance().await;

        self.transition(ReturnState::Submitting);
        let submitted =
            tokio::time::timeout(self.config.submit_timeout, self.backend.submit_return(&request))
                .await
                .unwrap_or_else(|_| {
                    warn!(
                        "Return of rental {} abandoned after {:?}",
                        self.rental_id, self.config.submit_timeout
                    );
                    Err(Error::Timeout)
                });

        match submitted {
            Ok(receipt) => {
                let outcome = ReturnOutcome::from_receipt(self.rental_id, receipt);
                {
                    let mut ctx = self.ctx();
                    ctx.completed = true;
                    if outcome.new_balance.is_some() {
                        ctx.balance = outcome.new_balance;
                    }
                }
                info!("Rental {} returned", self.rental_id);
                self.transition(ReturnState::Succeeded(outcome.clone()));
                Ok(outcome)
            }
            Err(e) => {
                error!("Return of rental {} failed: {}", self.rental_id, e);
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Leave a terminal state; returns the state we ended up in
    pub fn dismiss(&self) -> ReturnState {
        let current = self.state();
        let rental_loaded = self.ctx().rental.is_some();
        let Some(next) = current.dismissed(rental_loaded) else {
            return current;
        };

        if next == ReturnState::Idle {
            let today = Local::now().date_naive();
            *self.ctx() = Context::fresh(ReturnForm::new(today, self.config.default_notes.clone()));
        }
        self.transition(next.clone());
        next
    }

    fn select_rental(&self, response: ActiveRentalResponse) -> Result<Rental> {
        let Some(rental) = response.into_rental() else {
            return Err(Error::RentalNotFound(NO_ACTIVE_RENTAL.to_string()));
        };
        if rental.rental_id != self.rental_id {
            warn!(
                "Requested rental {} but the active rental is {}",
                self.rental_id, rental.rental_id
            );
            return Err(Error::RentalNotFound(RENTAL_MISMATCH.to_string()));
        }
        Ok(rental)
    }

    fn validate(&self) -> Result<ReturnRequest> {
        let ctx = self.ctx();
        let rental = ctx
            .rental
            .as_ref()
            .ok_or_else(|| Error::RentalNotFound(NO_ACTIVE_RENTAL.to_string()))?;

        if ctx.form.return_date < rental.start_date {
            return Err(Error::Validation(
                "Return date cannot be before the rental start date".to_string(),
            ));
        }
        let notes = ctx.form.notes.trim();
        if notes.is_empty() {
            return Err(Error::Validation("Please provide return notes".to_string()));
        }

        Ok(ReturnRequest {
            rental_id: rental.rental_id,
            return_date: ctx.form.return_date,
            return_notes: notes.to_string(),
        })
    }

    /// Best effort; the backend checks the balance again when committing
    async fn refresh_balance(&self) {
        match self.backend.balance().await {
            Ok(balance) => self.ctx().balance = Some(balance),
            Err(e) => warn!("Balance refresh before submitting rental {} failed: {}", self.rental_id, e),
        }
    }

    /// Back to `Ready` with the problem shown, unless only a sign-in helps
    fn bounce(&self, err: &Error) {
        if err.requires_sign_in() {
            self.fail(err);
        } else {
            self.transition(ReturnState::Ready {
                notice: Some(ReturnFailure::from(err)),
            });
        }
    }

    fn fail(&self, err: &Error) {
        let failure = ReturnFailure::from(err);
        if failure.requires_sign_in() {
            warn!(
                "Session rejected by the backend, signing out in {:?}",
                self.config.relogin_delay
            );
            self.session.expire_after(self.config.relogin_delay);
        }
        self.transition(ReturnState::Failed(failure));
    }

    fn transition(&self, next: ReturnState) {
        let name = next.name();
        let previous = self.state.send_replace(next);
        debug!(
            "Return workflow for rental {}: {} -> {}",
            self.rental_id, previous, name
        );
    }

    fn ctx(&self) -> MutexGuard<'_, Context> {
        self.ctx.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

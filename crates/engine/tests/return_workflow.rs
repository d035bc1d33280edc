mod support;

use rentdesk_core::{ActiveRentalResponse, Error, ErrorKind};
use rentdesk_engine::{FeeSource, ReturnState, ReturnWorkflow, WorkflowConfig};
use rentdesk_networking::{Session, SessionStatus};
use std::sync::Arc;
use std::time::Duration;
use support::{date, decision, receipt, rental, usd, FakeBackend};
use tokio::sync::Notify;

fn workflow(backend: FakeBackend) -> (Arc<FakeBackend>, Arc<Session>, ReturnWorkflow<FakeBackend>) {
    let backend = Arc::new(backend);
    let session = Arc::new(Session::with_token("token-abc"));
    let workflow = ReturnWorkflow::with_return_date(
        Arc::clone(&backend),
        Arc::clone(&session),
        42,
        WorkflowConfig::default(),
        date(2024, 1, 10),
    );
    (backend, session, workflow)
}

fn notice_of(state: &ReturnState) -> (ErrorKind, String) {
    match state {
        ReturnState::Ready { notice: Some(n) } => (n.kind, n.message.clone()),
        other => panic!("expected Ready with a notice, got {:?}", other),
    }
}

#[tokio::test]
async fn test_load_fetches_rental_and_balance() {
    let (backend, _, wf) = workflow(FakeBackend::new());
    assert_eq!(wf.state(), ReturnState::Idle);

    wf.load().await.unwrap();

    let view = wf.snapshot();
    assert_eq!(view.state, ReturnState::Ready { notice: None });
    assert_eq!(view.rental.unwrap().rental_id, 42);
    assert_eq!(view.balance, Some(usd(10000)));
    assert_eq!(backend.calls("active_rental"), 1);
    assert_eq!(backend.calls("balance"), 1);
}

#[tokio::test]
async fn test_rental_and_balance_are_fetched_concurrently() {
    let (backend, _, wf) = workflow(FakeBackend::new().with_load_barrier());

    // Sequential fetches would park forever on the barrier.
    tokio::time::timeout(Duration::from_secs(1), wf.load())
        .await
        .expect("rental and balance requests overlap")
        .unwrap();

    assert_eq!(wf.state(), ReturnState::Ready { notice: None });
    assert_eq!(backend.calls("active_rental"), 1);
    assert_eq!(backend.calls("balance"), 1);
}

#[tokio::test]
async fn test_two_days_late_estimate() {
    let (_, _, wf) = workflow(FakeBackend::new());
    wf.load().await.unwrap();

    let est = wf.set_return_date(date(2024, 1, 12)).unwrap();
    assert!(est.is_late);
    assert_eq!(est.days_late, 2);
    assert_eq!(est.fee_amount, usd(3000));
    assert_eq!(est.source, FeeSource::Local);
    assert_eq!(wf.snapshot().estimate, Some(est));
}

#[tokio::test]
async fn test_no_active_rental() {
    let (backend, _, wf) =
        workflow(FakeBackend::new().with_rental(Ok(ActiveRentalResponse::none())));

    let err = wf.load().await.unwrap_err();
    assert_eq!(err, Error::RentalNotFound("No active rental found".to_string()));
    match wf.state() {
        ReturnState::Failed(f) => assert_eq!(f.kind, ErrorKind::NotFound),
        other => panic!("unexpected state {:?}", other),
    }
    assert_eq!(backend.calls("check_return"), 0);
}

#[tokio::test]
async fn test_rental_id_mismatch() {
    let mut other = rental();
    other.rental_id = 99;
    let (_, _, wf) = workflow(FakeBackend::new().with_rental(Ok(ActiveRentalResponse::active(other))));

    let err = wf.load().await.unwrap_err();
    assert_eq!(err.to_string(), "Rental not found or not active");
    assert_eq!(wf.dismiss(), ReturnState::Idle);
}

#[tokio::test]
async fn test_balance_failure_does_not_block_load() {
    let (_, _, wf) = workflow(
        FakeBackend::new().with_balances(vec![Err(Error::NetworkError("offline".to_string()))]),
    );

    wf.load().await.unwrap();
    assert_eq!(wf.snapshot().balance, None);
    assert!(wf.state().accepts_submit());
}

#[tokio::test]
async fn test_empty_notes_never_reach_backend() {
    let (backend, _, wf) = workflow(FakeBackend::new());
    wf.load().await.unwrap();
    let before = backend.total_calls();

    wf.set_notes("   ");
    let err = wf.submit().await.unwrap_err();

    assert_eq!(err, Error::Validation("Please provide return notes".to_string()));
    let (kind, message) = notice_of(&wf.state());
    assert_eq!(kind, ErrorKind::Validation);
    assert_eq!(message, "Please provide return notes");
    assert_eq!(backend.total_calls(), before);
    assert_eq!(wf.snapshot().form.notes, "   ");
}

#[tokio::test]
async fn test_return_before_start_date_is_rejected_locally() {
    let (backend, _, wf) = workflow(FakeBackend::new());
    wf.load().await.unwrap();

    wf.set_return_date(date(2024, 1, 4));
    let err = wf.submit().await.unwrap_err();

    assert_eq!(err.to_string(), "Return date cannot be before the rental start date");
    assert_eq!(backend.calls("check_return"), 0);
    assert_eq!(backend.calls("submit_return"), 0);
    assert_eq!(wf.snapshot().form.return_date, date(2024, 1, 4));
}

#[tokio::test]
async fn test_insufficient_balance_returns_to_ready() {
    let (backend, _, wf) = workflow(
        FakeBackend::new()
            .with_balances(vec![Ok(usd(2000))])
            .with_decision(Ok(decision(false, 2, usd(3000), None))),
    );
    wf.load().await.unwrap();
    wf.set_return_date(date(2024, 1, 12));

    let err = wf.submit().await.unwrap_err();

    assert_eq!(
        err,
        Error::InsufficientFunds {
            required: usd(3000),
            available: usd(2000),
        }
    );
    let view = wf.snapshot();
    assert!(view.state.accepts_submit());
    let report = view.affordability.unwrap();
    assert!(report.is_insufficient());
    assert_eq!(report.shortfall(), Some(usd(1000)));
    assert_eq!(backend.calls("submit_return"), 0);
}

#[tokio::test]
async fn test_backend_refusal_is_shown_verbatim() {
    let (_, _, wf) = workflow(FakeBackend::new().with_decision(Ok(decision(
        false,
        2,
        usd(3000),
        Some("Insufficient balance to cover late fees of $30.00"),
    ))));
    wf.load().await.unwrap();
    wf.set_return_date(date(2024, 1, 12));

    wf.submit().await.unwrap_err();

    let (kind, message) = notice_of(&wf.state());
    assert_eq!(kind, ErrorKind::Rejected);
    assert_eq!(message, "Insufficient balance to cover late fees of $30.00");
}

#[tokio::test]
async fn test_affordability_network_failure_allows_retry() {
    let (backend, _, wf) = workflow(
        FakeBackend::new().with_decision(Err(Error::NetworkError("connection reset".to_string()))),
    );
    wf.load().await.unwrap();

    let err = wf.submit().await.unwrap_err();

    assert_eq!(
        err,
        Error::NetworkError("Affordability check failed, please retry".to_string())
    );
    assert!(wf.state().accepts_submit());
    assert_eq!(backend.calls("submit_return"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_expired_token_forces_sign_in() {
    let (backend, session, wf) =
        workflow(FakeBackend::new().with_receipt(Err(Error::TokenExpired)));
    wf.load().await.unwrap();

    let err = wf.submit().await.unwrap_err();

    assert_eq!(err, Error::TokenExpired);
    match wf.state() {
        ReturnState::Failed(f) => {
            assert_eq!(f.kind, ErrorKind::AuthExpired);
            assert!(f.requires_sign_in());
        }
        other => panic!("unexpected state {:?}", other),
    }
    assert_eq!(backend.calls("submit_return"), 1);
    assert!(session.is_signed_in());

    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert_eq!(session.status(), SessionStatus::Expired);
    assert!(session.token().is_none());
    assert_eq!(backend.calls("submit_return"), 1);
    assert_eq!(wf.dismiss(), ReturnState::Idle);
}

#[tokio::test]
async fn test_signed_out_session_never_reaches_backend() {
    let (backend, session, wf) = workflow(FakeBackend::new());
    wf.load().await.unwrap();
    session.clear_token().unwrap();

    let err = wf.submit().await.unwrap_err();

    assert_eq!(err, Error::NotAuthenticated);
    match wf.state() {
        ReturnState::Failed(f) => assert_eq!(f.kind, ErrorKind::AuthExpired),
        other => panic!("unexpected state {:?}", other),
    }
    assert_eq!(backend.calls("check_return"), 0);
    assert_eq!(backend.calls("submit_return"), 0);
}

#[tokio::test]
async fn test_second_submit_while_submitting_is_rejected() {
    let gate = Arc::new(Notify::new());
    let (backend, _, wf) = workflow(FakeBackend::new().with_submit_gate(Arc::clone(&gate)));
    wf.load().await.unwrap();
    let mut states = wf.subscribe();

    let first = wf.submit();
    let second = async {
        states
            .wait_for(|s| *s == ReturnState::Submitting)
            .await
            .unwrap();
        let result = wf.submit().await;
        gate.notify_one();
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err(), Error::SubmissionInFlight);
    assert_eq!(backend.calls("submit_return"), 1);
    assert_eq!(backend.calls("check_return"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_submission_times_out() {
    let (backend, _, wf) =
        workflow(FakeBackend::new().with_submit_delay(Duration::from_secs(60)));
    wf.load().await.unwrap();

    let err = wf.submit().await.unwrap_err();

    assert_eq!(err, Error::Timeout);
    match wf.state() {
        ReturnState::Failed(f) => assert_eq!(f.kind, ErrorKind::Timeout),
        other => panic!("unexpected state {:?}", other),
    }
    assert_eq!(backend.calls("submit_return"), 1);

    assert_eq!(wf.dismiss(), ReturnState::Ready { notice: None });
    assert!(wf.snapshot().rental.is_some());
}

#[tokio::test]
async fn test_backend_figures_replace_local_ones() {
    let (backend, _, wf) = workflow(
        FakeBackend::new()
            .with_decision(Ok(decision(true, 3, usd(5000), None)))
            .with_receipt(Ok(receipt(usd(35000), usd(15000)))),
    );
    wf.load().await.unwrap();
    wf.set_return_date(date(2024, 1, 12));
    wf.set_notes("Scratch on rear bumper");
    assert_eq!(wf.snapshot().estimate.unwrap().fee_amount, usd(3000));

    let outcome = wf.submit().await.unwrap();

    assert_eq!(outcome.final_amount, Some(usd(35000)));
    assert_eq!(outcome.new_balance, Some(usd(15000)));
    let view = wf.snapshot();
    let est = view.estimate.unwrap();
    assert_eq!(est.source, FeeSource::Confirmed);
    assert_eq!(est.days_late, 3);
    assert_eq!(est.fee_amount, usd(5000));
    assert_eq!(view.balance, Some(usd(15000)));
    assert!(matches!(view.state, ReturnState::Succeeded(_)));

    let sent = backend.requests();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains(r#""returnDate":"2024-01-12""#));
    assert!(sent[0].contains(r#""returnNotes":"Scratch on rear bumper""#));
}

#[tokio::test]
async fn test_balance_refresh_failure_does_not_block_submission() {
    let (backend, _, wf) = workflow(FakeBackend::new().with_balances(vec![
        Ok(usd(10000)),
        Err(Error::NetworkError("offline".to_string())),
    ]));
    wf.load().await.unwrap();

    wf.submit().await.unwrap();

    assert_eq!(backend.calls("balance"), 2);
    assert_eq!(wf.snapshot().balance, Some(usd(7000)));
}

#[tokio::test]
async fn test_success_locks_out_further_submits() {
    let (backend, _, wf) = workflow(FakeBackend::new());
    wf.load().await.unwrap();
    wf.submit().await.unwrap();

    assert_eq!(wf.submit().await.unwrap_err(), Error::AlreadyReturned);
    assert_eq!(backend.calls("submit_return"), 1);

    assert_eq!(wf.dismiss(), ReturnState::Idle);
    assert!(wf.snapshot().rental.is_none());
}

#[tokio::test]
async fn test_business_rejection_on_submit() {
    let (_, _, wf) = workflow(FakeBackend::new().with_receipt(Err(Error::ApiError {
        status: 400,
        message: "Vehicle inspection required before return".to_string(),
    })));
    wf.load().await.unwrap();

    wf.submit().await.unwrap_err();

    match wf.state() {
        ReturnState::Failed(f) => {
            assert_eq!(f.kind, ErrorKind::Rejected);
            assert_eq!(f.message, "Vehicle inspection required before return");
            assert!(!f.requires_sign_in());
        }
        other => panic!("unexpected state {:?}", other),
    }
}

#[tokio::test]
async fn test_changing_date_drops_confirmed_figures() {
    let (_, _, wf) = workflow(FakeBackend::new().with_decision(Ok(decision(
        false,
        2,
        usd(3000),
        Some("Please top up first"),
    ))));
    wf.load().await.unwrap();
    wf.set_return_date(date(2024, 1, 12));
    wf.submit().await.unwrap_err();
    assert!(wf.snapshot().affordability.is_some());

    let est = wf.set_return_date(date(2024, 1, 10)).unwrap();

    assert!(!est.is_late);
    assert_eq!(est.source, FeeSource::Local);
    assert!(wf.snapshot().affordability.is_none());
}

#[tokio::test]
async fn test_submit_before_load_is_refused() {
    let (backend, _, wf) = workflow(FakeBackend::new());

    assert!(matches!(wf.submit().await, Err(Error::Validation(_))));
    assert_eq!(backend.total_calls(), 0);
    assert_eq!(wf.state(), ReturnState::Idle);
}

//! Sign-in, verification and sign-out

use crate::RentalClient;
use rentdesk_core::{Error, LogoutRequest, Result, SignupRequest, TokenVerification, User};
use tracing::{info, warn};

/// Sign in and store the returned token in the client's session
pub async fn sign_in(client: &RentalClient, username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(Error::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let login = client.login(username.trim(), password).await?;
    let session = client.session();
    session.set_token(&login.token)?;
    session.set_username(username.trim())?;

    info!("Signed in as {}", username.trim());
    Ok(())
}

/// Create an account after the local form checks pass
///
/// Does not sign in; new accounts still have to verify their email.
pub async fn sign_up(
    client: &RentalClient,
    request: &SignupRequest,
    confirm_password: &str,
) -> Result<String> {
    request.validate(confirm_password)?;

    let response = client.signup(request).await?;
    info!("Account {} created", request.username);
    Ok(response.message.unwrap_or_else(|| {
        "Account created successfully! Please check your email for verification.".to_string()
    }))
}

/// Validate an arbitrary token with the backend
pub async fn verify(client: &RentalClient, token: &str) -> TokenVerification {
    client.verify_token(token).await
}

/// The identity behind the stored token, or `None` when signed out or rejected
pub async fn current_user(client: &RentalClient) -> Result<Option<User>> {
    let Some(token) = client.session().token() else {
        return Ok(None);
    };

    let verification = client.verify_token(&token).await;
    if !verification.valid {
        return Ok(None);
    }

    if let Some(user) = &verification.user {
        client.session().set_username(&user.username)?;
    }
    Ok(verification.user)
}

/// Sign out
///
/// The backend call is best-effort: the local token is cleared even when the
/// call fails or the backend is unreachable.
pub async fn logout(client: &RentalClient) -> Result<()> {
    let session = client.session();

    if session.is_signed_in() {
        let body = LogoutRequest {
            username: session.username().unwrap_or_else(|| "unknown".to_string()),
            logout_reason: "user_initiated".to_string(),
            timestamp: chrono::Utc::now(),
        };

        match client.logout(&body).await {
            Ok(()) => info!("Backend logout successful"),
            Err(e) => warn!("Backend logout failed, clearing local session anyway: {}", e),
        }
    }

    session.clear_token()
}

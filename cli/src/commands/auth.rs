use super::prompt_line;
use crate::AppState;
use rentdesk_core::SignupRequest;
use rentdesk_networking::api;
use tracing::info;

pub async fn sign_in(state: &AppState, username: String, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_line("Password: ")?,
    };

    api::sign_in(&state.client, &username, &password).await?;
    println!("Signed in as {}", username.trim());
    Ok(())
}

/// Create an account; prompts for the password twice when not given
pub async fn sign_up(
    state: &AppState,
    mut request: SignupRequest,
    password: Option<String>,
) -> anyhow::Result<()> {
    let confirm_password = match password {
        Some(password) => {
            request.password = password.clone();
            password
        }
        None => {
            request.password = prompt_line("Password: ")?;
            prompt_line("Confirm password: ")?
        }
    };

    let message = api::sign_up(&state.client, &request, &confirm_password).await?;
    println!("{}", message);
    println!("Verify your email, then run `rentdesk signin {}`", request.username.trim());
    Ok(())
}

pub async fn sign_out(state: &AppState) -> anyhow::Result<()> {
    if !state.session.is_signed_in() {
        println!("Not signed in");
        return Ok(());
    }

    api::logout(&state.client).await?;
    info!("Local session cleared");
    println!("Signed out");
    Ok(())
}

pub async fn who_am_i(state: &AppState) -> anyhow::Result<()> {
    match api::current_user(&state.client).await? {
        Some(user) => println!("{} <{}>", user.display_name(), user.email),
        None => println!("Not signed in"),
    }
    Ok(())
}

//! Authentication route handlers.
//!
//! Thin adapters between the JSON surface and the
//! [`AuthFlow`](crate::flows::AuthFlow) state machine. Submissions take
//! the browsing-state lock with `try_lock`, so a second submission while
//! one is in flight is rejected with 409 instead of being double-sent.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use quickbite_core::{Email, Role};

use crate::account::AccountApi;
use crate::error::{AppError, Result};
use crate::flows::{AuthFlow, SignInForm, SignUpForm, SubmitOutcome};
use crate::identity::{IdentityAssertion, PostedAssertion};
use crate::models::{CurrentAccount, session_keys};
use crate::state::AppState;

use super::browsing_state;

// =============================================================================
// Payload Types
// =============================================================================

/// The name/email claim the SPA obtained from the provider popup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionPayload {
    pub full_name: String,
    pub email: String,
}

/// Identity-assertion sign-up payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySignUpPayload {
    /// Absent when the popup was dismissed or failed client-side.
    #[serde(default)]
    pub assertion: Option<AssertionPayload>,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Identity-assertion sign-in payload.
#[derive(Debug, Deserialize)]
pub struct IdentitySignInPayload {
    #[serde(default)]
    pub assertion: Option<AssertionPayload>,
}

/// Replay a posted claim as a one-shot provider. A missing or malformed
/// claim behaves exactly like a dismissed popup.
fn posted_assertion(payload: Option<AssertionPayload>) -> PostedAssertion {
    PostedAssertion::new(payload.and_then(|claim| {
        Email::parse(&claim.email).ok().map(|email| IdentityAssertion {
            display_name: claim.full_name,
            email,
        })
    }))
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle password sign-up.
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SignUpForm>,
) -> Result<Response> {
    let handle = browsing_state(&state, &session).await?;
    let Ok(mut browsing) = handle.try_lock() else {
        return Err(AppError::SubmissionInFlight);
    };

    let outcome = browsing.auth.sign_up(&form, state.accounts()).await;
    respond(&session, &browsing.auth, outcome).await
}

/// Handle password sign-in.
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SignInForm>,
) -> Result<Response> {
    let handle = browsing_state(&state, &session).await?;
    let Ok(mut browsing) = handle.try_lock() else {
        return Err(AppError::SubmissionInFlight);
    };

    let outcome = browsing.auth.sign_in(&form, state.accounts()).await;
    respond(&session, &browsing.auth, outcome).await
}

/// Handle identity-assertion sign-up.
pub async fn identity_sign_up(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<IdentitySignUpPayload>,
) -> Result<Response> {
    let handle = browsing_state(&state, &session).await?;
    let Ok(mut browsing) = handle.try_lock() else {
        return Err(AppError::SubmissionInFlight);
    };

    let provider = posted_assertion(payload.assertion);
    let outcome = browsing
        .auth
        .sign_up_with_identity(&payload.mobile, payload.role, &provider, state.accounts())
        .await;
    respond(&session, &browsing.auth, outcome).await
}

/// Handle identity-assertion sign-in.
pub async fn identity_sign_in(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<IdentitySignInPayload>,
) -> Result<Response> {
    let handle = browsing_state(&state, &session).await?;
    let Ok(mut browsing) = handle.try_lock() else {
        return Err(AppError::SubmissionInFlight);
    };

    let provider = posted_assertion(payload.assertion);
    let outcome = browsing
        .auth
        .sign_in_with_identity(&provider, state.accounts())
        .await;
    respond(&session, &browsing.auth, outcome).await
}

/// Handle sign-out: drop the browsing state and destroy the session.
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Response> {
    if let Some(key) = session.get::<String>(session_keys::BROWSING_KEY).await? {
        state.sessions().evict(&key).await;
    }
    session.flush().await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Return the signed-in account for this session.
///
/// Falls back to the Account Service's own session cookie, where any
/// failure simply means "no session".
pub async fn me(State(state): State<AppState>, session: Session) -> Result<Response> {
    if let Some(current) = session
        .get::<CurrentAccount>(session_keys::CURRENT_ACCOUNT)
        .await?
    {
        return Ok(Json(current).into_response());
    }

    match state.accounts().current_session().await {
        Some(account) => {
            let current = CurrentAccount::from(account);
            session
                .insert(session_keys::CURRENT_ACCOUNT, &current)
                .await?;
            Ok(Json(current).into_response())
        }
        None => Err(AppError::Unauthorized("No active session.".to_owned())),
    }
}

/// Translate a flow outcome into a JSON response, establishing the
/// session identity only on a sign-in.
async fn respond(session: &Session, flow: &AuthFlow, outcome: SubmitOutcome) -> Result<Response> {
    match outcome {
        SubmitOutcome::SignedIn => {
            let account = flow
                .account()
                .cloned()
                .ok_or_else(|| AppError::Internal("signed-in flow holds no account".to_owned()))?;

            let current = CurrentAccount::from(account.clone());
            session
                .insert(session_keys::CURRENT_ACCOUNT, &current)
                .await?;

            Ok((StatusCode::OK, Json(json!({ "account": account }))).into_response())
        }
        SubmitOutcome::RedirectToSignIn => {
            // Successful sign-up records the account but deliberately does
            // not establish a session
            let account = flow
                .account()
                .cloned()
                .ok_or_else(|| AppError::Internal("completed flow holds no account".to_owned()))?;

            Ok((
                StatusCode::CREATED,
                Json(json!({ "account": account, "redirect": "/signin" })),
            )
                .into_response())
        }
        SubmitOutcome::Advanced | SubmitOutcome::Stayed => {
            let message = flow
                .error()
                .unwrap_or("Something went wrong, please try again!");
            Ok((
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message })),
            )
                .into_response())
        }
    }
}

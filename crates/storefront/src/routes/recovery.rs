//! Credential-recovery route handlers.
//!
//! Each endpoint drives exactly one wizard step; the
//! [`RecoveryFlow`](crate::flows::RecoveryFlow) owns the forward-only
//! progression. Submissions `try_lock` the browsing state, so a second
//! submission while one is in flight gets 409.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::flows::{RecoveryFlow, RecoveryStage, SubmitOutcome};
use crate::state::AppState;

use super::browsing_state;

// =============================================================================
// Payload Types
// =============================================================================

/// Step-one payload.
#[derive(Debug, Deserialize)]
pub struct EmailForm {
    pub email: String,
}

/// Step-two payload.
#[derive(Debug, Deserialize)]
pub struct OtpForm {
    pub otp: String,
}

/// Step-three payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordForm {
    pub new_password: String,
    pub confirm_password: String,
}

/// What the wizard surface renders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    /// One-based step number (1-3).
    pub step: u8,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl WizardView {
    fn from_flow(flow: &RecoveryFlow, redirect: Option<&'static str>) -> Self {
        Self {
            step: flow.stage().ordinal(),
            email: flow.email().to_owned(),
            error: flow.error().map(str::to_owned),
            redirect,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Return the wizard's current state (for SPA resume after a reload).
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<WizardView>> {
    let handle = browsing_state(&state, &session).await?;
    let browsing = handle.lock().await;

    Ok(Json(WizardView::from_flow(&browsing.recovery, None)))
}

/// Step 1: collect the email and request an OTP.
pub async fn submit_email(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<EmailForm>,
) -> Result<Response> {
    let handle = browsing_state(&state, &session).await?;
    let Ok(mut browsing) = handle.try_lock() else {
        return Err(AppError::SubmissionInFlight);
    };
    expect_stage(&browsing.recovery, RecoveryStage::Request)?;

    browsing.recovery.set_email(form.email);
    let outcome = browsing.recovery.submit(state.accounts()).await;

    Ok(wizard_response(&browsing.recovery, outcome))
}

/// Step 2: collect the OTP and verify it.
pub async fn submit_otp(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<OtpForm>,
) -> Result<Response> {
    let handle = browsing_state(&state, &session).await?;
    let Ok(mut browsing) = handle.try_lock() else {
        return Err(AppError::SubmissionInFlight);
    };
    expect_stage(&browsing.recovery, RecoveryStage::Verify)?;

    browsing.recovery.set_otp(form.otp);
    let outcome = browsing.recovery.submit(state.accounts()).await;

    Ok(wizard_response(&browsing.recovery, outcome))
}

/// Step 3: collect both password fields and reset.
pub async fn submit_password(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<PasswordForm>,
) -> Result<Response> {
    let handle = browsing_state(&state, &session).await?;
    let Ok(mut browsing) = handle.try_lock() else {
        return Err(AppError::SubmissionInFlight);
    };
    expect_stage(&browsing.recovery, RecoveryStage::Reset)?;

    browsing.recovery.set_new_password(form.new_password);
    browsing.recovery.set_confirm_password(form.confirm_password);
    let outcome = browsing.recovery.submit(state.accounts()).await;

    Ok(wizard_response(&browsing.recovery, outcome))
}

/// Reject a payload posted against the wrong step. The wizard itself
/// never skips; this only keeps mismatched requests from editing fields
/// out of turn.
fn expect_stage(flow: &RecoveryFlow, expected: RecoveryStage) -> Result<()> {
    if flow.stage() == expected {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "The recovery wizard is not at this step.".to_owned(),
        ))
    }
}

fn wizard_response(flow: &RecoveryFlow, outcome: SubmitOutcome) -> Response {
    let redirect = (outcome == SubmitOutcome::RedirectToSignIn).then_some("/signin");
    let status = if outcome == SubmitOutcome::Stayed {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    (status, Json(WizardView::from_flow(flow, redirect))).into_response()
}

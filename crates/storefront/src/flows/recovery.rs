//! Credential-recovery wizard: request an OTP, verify it, set a new
//! password.
//!
//! Three ordered stages with no skipping and no going back; the only way
//! to see stage one again is a successful stage-three submission, which
//! restarts the wizard empty.

use tracing::warn;

use crate::account::AccountApi;

use super::SubmitOutcome;

const MSG_EMAIL_REQUIRED: &str = "Email is required!";
const MSG_OTP_REQUIRED: &str = "OTP is required!";
const MSG_BOTH_PASSWORDS_REQUIRED: &str = "Both password fields are required!";
const MSG_PASSWORDS_MISMATCH: &str = "Passwords do not match!";

const MSG_SEND_OTP_FAILED: &str = "Failed to send OTP. Try again!";
const MSG_VERIFY_OTP_FAILED: &str = "Invalid OTP. Please check and try again.";
const MSG_RESET_FAILED: &str = "Failed to reset password. Try again!";

/// The wizard's ordered stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum RecoveryStage {
    /// Collect an email and ask the service to issue an OTP.
    #[default]
    Request,
    /// Collect the OTP and have the service verify it.
    Verify,
    /// Collect and confirm the new password.
    Reset,
}

impl RecoveryStage {
    /// One-based ordinal, as shown to the user ("step 2 of 3").
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Request => 1,
            Self::Verify => 2,
            Self::Reset => 3,
        }
    }
}

/// The credential-recovery state machine.
///
/// Holds the fields collected so far and the single latest error message,
/// which is cleared the moment any field is edited - the error on screen
/// always belongs to the most recent submission attempt.
#[derive(Debug, Default)]
pub struct RecoveryFlow {
    stage: RecoveryStage,
    email: String,
    otp: String,
    new_password: String,
    confirm_password: String,
    error: Option<String>,
}

impl RecoveryFlow {
    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> RecoveryStage {
        self.stage
    }

    /// The email the wizard was started with.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The latest error message, if the last attempt failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Edit the email field. Clears the error.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.error = None;
    }

    /// Edit the OTP field. Clears the error.
    pub fn set_otp(&mut self, otp: impl Into<String>) {
        self.otp = otp.into();
        self.error = None;
    }

    /// Edit the new-password field. Clears the error.
    pub fn set_new_password(&mut self, password: impl Into<String>) {
        self.new_password = password.into();
        self.error = None;
    }

    /// Edit the confirm-password field. Clears the error.
    pub fn set_confirm_password(&mut self, password: impl Into<String>) {
        self.confirm_password = password.into();
        self.error = None;
    }

    /// Submit whatever stage the wizard is at.
    ///
    /// A successful submission advances exactly one stage; any failure
    /// leaves the stage where it was with the error set.
    pub async fn submit<A: AccountApi>(&mut self, accounts: &A) -> SubmitOutcome {
        match self.stage {
            RecoveryStage::Request => self.submit_request(accounts).await,
            RecoveryStage::Verify => self.submit_verify(accounts).await,
            RecoveryStage::Reset => self.submit_reset(accounts).await,
        }
    }

    async fn submit_request<A: AccountApi>(&mut self, accounts: &A) -> SubmitOutcome {
        if self.email.is_empty() {
            self.error = Some(MSG_EMAIL_REQUIRED.to_owned());
            return SubmitOutcome::Stayed;
        }

        match accounts.send_otp(&self.email).await {
            Ok(()) => {
                self.error = None;
                self.stage = RecoveryStage::Verify;
                SubmitOutcome::Advanced
            }
            Err(err) => {
                warn!(error = %err, "otp request failed");
                self.error = Some(MSG_SEND_OTP_FAILED.to_owned());
                SubmitOutcome::Stayed
            }
        }
    }

    async fn submit_verify<A: AccountApi>(&mut self, accounts: &A) -> SubmitOutcome {
        if self.otp.is_empty() {
            self.error = Some(MSG_OTP_REQUIRED.to_owned());
            return SubmitOutcome::Stayed;
        }

        // An expired code fails service-side exactly like a wrong one;
        // the wizard does not tell them apart.
        match accounts.verify_otp(&self.email, &self.otp).await {
            Ok(()) => {
                self.error = None;
                self.stage = RecoveryStage::Reset;
                SubmitOutcome::Advanced
            }
            Err(err) => {
                warn!(error = %err, "otp verification failed");
                self.error = Some(MSG_VERIFY_OTP_FAILED.to_owned());
                SubmitOutcome::Stayed
            }
        }
    }

    async fn submit_reset<A: AccountApi>(&mut self, accounts: &A) -> SubmitOutcome {
        if self.new_password.is_empty() || self.confirm_password.is_empty() {
            self.error = Some(MSG_BOTH_PASSWORDS_REQUIRED.to_owned());
            return SubmitOutcome::Stayed;
        }
        if self.new_password != self.confirm_password {
            self.error = Some(MSG_PASSWORDS_MISMATCH.to_owned());
            return SubmitOutcome::Stayed;
        }

        match accounts
            .reset_password(&self.email, &self.new_password)
            .await
        {
            Ok(()) => {
                // Wizard done: every field cleared, back to stage one
                *self = Self::default();
                SubmitOutcome::RedirectToSignIn
            }
            Err(err) => {
                warn!(error = %err, "password reset failed");
                self.error = Some(MSG_RESET_FAILED.to_owned());
                SubmitOutcome::Stayed
            }
        }
    }
}

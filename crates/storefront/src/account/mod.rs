//! Account Service client.
//!
//! The Account Service owns every account record and the OTP recovery
//! state; this app only drives it over HTTP. Credentials (the service's
//! session cookie) are included on every call.
//!
//! # Example
//!
//! ```rust,ignore
//! use quickbite_storefront::account::{AccountApi, AccountClient};
//!
//! let accounts = AccountClient::new(&config.account)?;
//! let record = accounts.sign_in(&SignInRequest {
//!     email: "diner@example.com".into(),
//!     password: "hunter2-but-longer".into(),
//! }).await?;
//! ```

mod client;
mod types;

pub use client::AccountClient;
pub use types::{IdentityAuthRequest, SessionAccount, SignInRequest, SignUpRequest};

use thiserror::Error;

/// Errors that can occur when calling the Account Service.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("account service returned {status}")]
    Status {
        /// HTTP status of the response.
        status: reqwest::StatusCode,
        /// Message extracted from the response body, if any.
        message: Option<String>,
    },
}

impl AccountError {
    /// The message to show the user for this failure.
    ///
    /// Three tiers, applied in order: a message carried by the error body
    /// (structured `{"message": ...}` object or plain string body), then
    /// the caller's path-specific fallback.
    #[must_use]
    pub fn surface_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Status { message: None, .. } | Self::Http(_) => fallback.to_owned(),
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// A JSON object with a string `message` field wins; a JSON string or a
/// non-empty plain-text body is used verbatim; anything else yields `None`
/// and the caller's fallback applies.
fn extract_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        return match value {
            serde_json::Value::Object(map) => match map.get("message") {
                Some(serde_json::Value::String(message)) => Some(message.clone()),
                _ => None,
            },
            serde_json::Value::String(message) if !message.trim().is_empty() => Some(message),
            _ => None,
        };
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Operations the Account Service exposes.
///
/// The flows take this as explicit context so tests can substitute a stub
/// without any network.
#[allow(async_fn_in_trait)]
pub trait AccountApi {
    /// Create an account with a password credential.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SessionAccount, AccountError>;

    /// Establish a session with email and password.
    async fn sign_in(&self, request: &SignInRequest) -> Result<SessionAccount, AccountError>;

    /// Unified create-or-match endpoint for identity-provider assertions,
    /// shared by sign-up and sign-in.
    async fn identity_auth(
        &self,
        request: &IdentityAuthRequest,
    ) -> Result<SessionAccount, AccountError>;

    /// Issue a recovery OTP bound to `email`.
    async fn send_otp(&self, email: &str) -> Result<(), AccountError>;

    /// Verify a recovery OTP. Expiry is checked service-side and is not
    /// distinguishable from a wrong code.
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), AccountError>;

    /// Replace the password after a verified recovery.
    async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AccountError>;

    /// Fetch the account behind the current service session cookie.
    /// Any failure means "no session".
    async fn current_session(&self) -> Option<SessionAccount>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_structured_message() {
        assert_eq!(
            extract_message(r#"{"message":"X"}"#),
            Some("X".to_owned())
        );
    }

    #[test]
    fn test_extract_plain_string_body() {
        // A JSON string body and a raw text body both count as tier two
        assert_eq!(extract_message("\"Y\""), Some("Y".to_owned()));
        assert_eq!(extract_message("Y"), Some("Y".to_owned()));
    }

    #[test]
    fn test_extract_nothing_usable() {
        assert_eq!(extract_message(""), None);
        assert_eq!(extract_message("   "), None);
        assert_eq!(extract_message("null"), None);
        assert_eq!(extract_message("42"), None);
        assert_eq!(extract_message(r#"{"error":"X"}"#), None);
        assert_eq!(extract_message(r#"{"message":7}"#), None);
    }

    #[test]
    fn test_surface_message_tiers() {
        let structured = AccountError::Status {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: Some("X".to_owned()),
        };
        assert_eq!(structured.surface_message("fallback"), "X");

        let bare = AccountError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(bare.surface_message("fallback"), "fallback");
    }
}

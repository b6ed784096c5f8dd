//! Request and response types for the Account Service wire format.
//!
//! Field names are camelCase on the wire, matching what the service's
//! other clients send.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quickbite_core::{AccountId, Email, Role};

/// Payload for password-based sign-up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub role: Role,
}

/// Payload for password-based sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Payload for the unified identity-assertion endpoint.
///
/// Sign-up sends the locally-collected mobile number and role alongside
/// the assertion; sign-in sends the assertion alone and the service
/// matches the existing account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityAuthRequest {
    pub full_name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// The account record the service returns from session-establishing calls.
///
/// Values coming back from the service are assumed valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAccount {
    #[serde(rename = "_id", alias = "id")]
    pub id: AccountId,
    pub full_name: String,
    pub email: Email,
    #[serde(default)]
    pub mobile: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

//! Session-related types.
//!
//! Types stored in the session cookie for authentication state.

use serde::{Deserialize, Serialize};

use quickbite_core::{AccountId, Email, Role};

use crate::account::SessionAccount;

/// Session-stored account identity.
///
/// Minimal data stored in the session to identify the signed-in account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAccount {
    /// Account Service identifier.
    pub id: AccountId,
    /// Display name.
    pub full_name: String,
    /// Normalized email address.
    pub email: Email,
    /// Role driving which dashboard the SPA shows.
    pub role: Role,
}

impl From<SessionAccount> for CurrentAccount {
    fn from(account: SessionAccount) -> Self {
        Self {
            id: account.id,
            full_name: account.full_name,
            email: account.email,
            role: account.role,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the signed-in account.
    pub const CURRENT_ACCOUNT: &str = "current_account";

    /// Key tying the cookie session to its browsing state (cart + wizards).
    pub const BROWSING_KEY: &str = "browsing_key";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_account_from_session_account() {
        let account = SessionAccount {
            id: AccountId::from("66f2a1"),
            full_name: "Asha Patel".to_owned(),
            email: Email::parse("asha@example.com").unwrap(),
            mobile: "5550100".to_owned(),
            role: Role::Owner,
            created_at: None,
            updated_at: None,
        };

        let current = CurrentAccount::from(account);
        assert_eq!(current.id.as_str(), "66f2a1");
        assert_eq!(current.role, Role::Owner);
    }
}

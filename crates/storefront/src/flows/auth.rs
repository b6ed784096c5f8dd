//! Authentication flow: sign-up and sign-in, each with a password path
//! and an identity-assertion path.

use serde::Deserialize;
use tracing::warn;

use quickbite_core::Role;

use crate::account::{AccountApi, IdentityAuthRequest, SessionAccount, SignInRequest, SignUpRequest};
use crate::identity::IdentityProvider;

use super::SubmitOutcome;

const MSG_ALL_FIELDS_REQUIRED: &str = "All fields are required!";
const MSG_FILL_IN_ALL_FIELDS: &str = "Please fill in all fields.";
const MSG_MOBILE_REQUIRED: &str = "Mobile number is required";

const FALLBACK_SIGNUP: &str = "Signup failed, please try again!";
const FALLBACK_SIGNIN: &str = "Signin failed, please try again!";
const FALLBACK_IDENTITY_SIGNUP: &str = "Identity sign-up failed, please try again!";
const FALLBACK_IDENTITY_SIGNIN: &str = "Identity sign-in failed, please try again!";

/// Fields collected by the sign-up surface.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    /// Defaults to [`Role::Customer`] when unspecified.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Fields collected by the sign-in surface.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Where the authentication flow currently stands.
#[derive(Debug, Clone, Default)]
pub enum AuthStatus {
    /// No attempt in progress, no identity held.
    #[default]
    Anonymous,
    /// A session-establishing call is in flight.
    Pending,
    /// The Account Service accepted the attempt.
    Authenticated(SessionAccount),
}

/// The authentication state machine.
///
/// `Anonymous -> Pending -> (Authenticated | Anonymous + error)`. The
/// `Pending` status doubles as the loading indicator: it is asserted for
/// the duration of every network call and cleared on both outcomes. A
/// local validation failure never enters `Pending` - no call is made, so
/// the indicator is never set rather than set-then-cleared.
#[derive(Debug, Default)]
pub struct AuthFlow {
    status: AuthStatus,
    error: Option<String>,
}

impl AuthFlow {
    /// Current status.
    #[must_use]
    pub const fn status(&self) -> &AuthStatus {
        &self.status
    }

    /// The authenticated account, if any.
    #[must_use]
    pub const fn account(&self) -> Option<&SessionAccount> {
        match &self.status {
            AuthStatus::Authenticated(account) => Some(account),
            AuthStatus::Anonymous | AuthStatus::Pending => None,
        }
    }

    /// The latest error message, if the last attempt failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drop any held identity and start over.
    pub fn sign_out(&mut self) {
        self.status = AuthStatus::Anonymous;
        self.error = None;
    }

    fn fail(&mut self, message: impl Into<String>) -> SubmitOutcome {
        self.status = AuthStatus::Anonymous;
        self.error = Some(message.into());
        SubmitOutcome::Stayed
    }

    /// Password-path sign-up.
    ///
    /// Successful sign-up records the account but deliberately does not
    /// establish a session; the caller is directed to the sign-in surface.
    pub async fn sign_up<A: AccountApi>(
        &mut self,
        form: &SignUpForm,
        accounts: &A,
    ) -> SubmitOutcome {
        self.error = None;

        if form.full_name.is_empty()
            || form.email.is_empty()
            || form.mobile.is_empty()
            || form.password.is_empty()
        {
            return self.fail(MSG_ALL_FIELDS_REQUIRED);
        }

        let request = SignUpRequest {
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
            mobile: form.mobile.clone(),
            role: form.role.unwrap_or_default(),
        };

        self.status = AuthStatus::Pending;
        match accounts.sign_up(&request).await {
            Ok(account) => {
                self.status = AuthStatus::Authenticated(account);
                SubmitOutcome::RedirectToSignIn
            }
            Err(err) => {
                warn!(error = %err, "sign-up failed");
                self.fail(err.surface_message(FALLBACK_SIGNUP))
            }
        }
    }

    /// Password-path sign-in.
    pub async fn sign_in<A: AccountApi>(
        &mut self,
        form: &SignInForm,
        accounts: &A,
    ) -> SubmitOutcome {
        self.error = None;

        if form.email.is_empty() || form.password.is_empty() {
            return self.fail(MSG_FILL_IN_ALL_FIELDS);
        }

        let request = SignInRequest {
            email: form.email.clone(),
            password: form.password.clone(),
        };

        self.status = AuthStatus::Pending;
        match accounts.sign_in(&request).await {
            Ok(account) => {
                self.status = AuthStatus::Authenticated(account);
                SubmitOutcome::SignedIn
            }
            Err(err) => {
                warn!(error = %err, "sign-in failed");
                self.fail(err.surface_message(FALLBACK_SIGNIN))
            }
        }
    }

    /// Identity-assertion sign-up.
    ///
    /// The mobile number is validated before the provider is consulted at
    /// all: without one, neither the popup nor any network call happens.
    pub async fn sign_up_with_identity<P: IdentityProvider, A: AccountApi>(
        &mut self,
        mobile: &str,
        role: Option<Role>,
        provider: &P,
        accounts: &A,
    ) -> SubmitOutcome {
        self.error = None;

        if mobile.is_empty() {
            return self.fail(MSG_MOBILE_REQUIRED);
        }

        self.status = AuthStatus::Pending;
        let assertion = match provider.request_assertion().await {
            Ok(assertion) => assertion,
            Err(err) => {
                // Provider details never reach the user
                warn!(error = %err, "identity provider hand-off failed");
                return self.fail(FALLBACK_IDENTITY_SIGNUP);
            }
        };

        let request = IdentityAuthRequest {
            full_name: assertion.display_name,
            email: assertion.email,
            mobile: Some(mobile.to_owned()),
            role: Some(role.unwrap_or_default()),
        };

        match accounts.identity_auth(&request).await {
            Ok(account) => {
                self.status = AuthStatus::Authenticated(account);
                SubmitOutcome::RedirectToSignIn
            }
            Err(err) => {
                warn!(error = %err, "identity sign-up failed");
                self.fail(err.surface_message(FALLBACK_IDENTITY_SIGNUP))
            }
        }
    }

    /// Identity-assertion sign-in. No locally-collected fields.
    pub async fn sign_in_with_identity<P: IdentityProvider, A: AccountApi>(
        &mut self,
        provider: &P,
        accounts: &A,
    ) -> SubmitOutcome {
        self.error = None;

        self.status = AuthStatus::Pending;
        let assertion = match provider.request_assertion().await {
            Ok(assertion) => assertion,
            Err(err) => {
                warn!(error = %err, "identity provider hand-off failed");
                return self.fail(FALLBACK_IDENTITY_SIGNIN);
            }
        };

        let request = IdentityAuthRequest {
            full_name: assertion.display_name,
            email: assertion.email,
            mobile: None,
            role: None,
        };

        match accounts.identity_auth(&request).await {
            Ok(account) => {
                self.status = AuthStatus::Authenticated(account);
                SubmitOutcome::SignedIn
            }
            Err(err) => {
                warn!(error = %err, "identity sign-in failed");
                self.fail(err.surface_message(FALLBACK_IDENTITY_SIGNIN))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::flows::testing::StubAccounts;
    use crate::identity::{IdentityAssertion, PostedAssertion};
    use quickbite_core::Email;

    fn sign_up_form() -> SignUpForm {
        SignUpForm {
            full_name: "Asha Patel".to_owned(),
            email: "asha@example.com".to_owned(),
            mobile: "5550100".to_owned(),
            password: "plenty-long-password".to_owned(),
            role: None,
        }
    }

    fn sign_in_form() -> SignInForm {
        SignInForm {
            email: "asha@example.com".to_owned(),
            password: "plenty-long-password".to_owned(),
        }
    }

    fn assertion() -> PostedAssertion {
        PostedAssertion::new(Some(IdentityAssertion {
            display_name: "Asha Patel".to_owned(),
            email: Email::parse("asha@example.com").unwrap(),
        }))
    }

    #[tokio::test]
    async fn test_sign_up_success_redirects_to_sign_in() {
        let accounts = StubAccounts::succeeding();
        let mut flow = AuthFlow::default();

        let outcome = flow.sign_up(&sign_up_form(), &accounts).await;

        assert_eq!(outcome, SubmitOutcome::RedirectToSignIn);
        assert!(flow.account().is_some());
        assert!(flow.error().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_missing_field_is_local() {
        let accounts = StubAccounts::succeeding();
        let mut flow = AuthFlow::default();
        let form = SignUpForm {
            mobile: String::new(),
            ..sign_up_form()
        };

        let outcome = flow.sign_up(&form, &accounts).await;

        assert_eq!(outcome, SubmitOutcome::Stayed);
        assert_eq!(flow.error(), Some("All fields are required!"));
        assert!(matches!(flow.status(), AuthStatus::Anonymous));
        // Local validation failure: no network call was made
        assert_eq!(accounts.call_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let accounts = StubAccounts::succeeding();
        let mut flow = AuthFlow::default();

        let outcome = flow.sign_in(&sign_in_form(), &accounts).await;

        assert_eq!(outcome, SubmitOutcome::SignedIn);
        assert_eq!(flow.account().unwrap().full_name, "Asha Patel");
    }

    #[tokio::test]
    async fn test_sign_in_missing_password_aborts_locally() {
        let accounts = StubAccounts::succeeding();
        let mut flow = AuthFlow::default();
        let form = SignInForm {
            password: String::new(),
            ..sign_in_form()
        };

        let outcome = flow.sign_in(&form, &accounts).await;

        assert_eq!(outcome, SubmitOutcome::Stayed);
        assert_eq!(flow.error(), Some("Please fill in all fields."));
        assert_eq!(accounts.call_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_surfaces_structured_message_verbatim() {
        let accounts = StubAccounts::failing_with("Incorrect password");
        let mut flow = AuthFlow::default();

        let outcome = flow.sign_in(&sign_in_form(), &accounts).await;

        assert_eq!(outcome, SubmitOutcome::Stayed);
        assert_eq!(flow.error(), Some("Incorrect password"));
        assert!(matches!(flow.status(), AuthStatus::Anonymous));
    }

    #[tokio::test]
    async fn test_sign_in_falls_back_to_generic_message() {
        let accounts = StubAccounts::failing_bare();
        let mut flow = AuthFlow::default();

        flow.sign_in(&sign_in_form(), &accounts).await;

        assert_eq!(flow.error(), Some("Signin failed, please try again!"));
    }

    #[tokio::test]
    async fn test_identity_sign_up_requires_mobile_before_provider() {
        let accounts = StubAccounts::succeeding();
        let mut flow = AuthFlow::default();

        let outcome = flow
            .sign_up_with_identity("", None, &assertion(), &accounts)
            .await;

        assert_eq!(outcome, SubmitOutcome::Stayed);
        assert_eq!(flow.error(), Some("Mobile number is required"));
        assert_eq!(accounts.call_count(), 0);
    }

    #[tokio::test]
    async fn test_identity_sign_up_success() {
        let accounts = StubAccounts::succeeding();
        let mut flow = AuthFlow::default();

        let outcome = flow
            .sign_up_with_identity("5550100", None, &assertion(), &accounts)
            .await;

        assert_eq!(outcome, SubmitOutcome::RedirectToSignIn);
        assert_eq!(accounts.call_count(), 1);
    }

    #[tokio::test]
    async fn test_identity_provider_failure_is_generic() {
        let accounts = StubAccounts::succeeding();
        let mut flow = AuthFlow::default();
        let cancelled = PostedAssertion::new(None);

        let outcome = flow.sign_in_with_identity(&cancelled, &accounts).await;

        assert_eq!(outcome, SubmitOutcome::Stayed);
        assert_eq!(
            flow.error(),
            Some("Identity sign-in failed, please try again!")
        );
        assert!(matches!(flow.status(), AuthStatus::Anonymous));
        // The service was never reached
        assert_eq!(accounts.call_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_out_returns_to_anonymous() {
        let accounts = StubAccounts::succeeding();
        let mut flow = AuthFlow::default();
        flow.sign_in(&sign_in_form(), &accounts).await;

        flow.sign_out();

        assert!(matches!(flow.status(), AuthStatus::Anonymous));
        assert!(flow.account().is_none());
    }
}

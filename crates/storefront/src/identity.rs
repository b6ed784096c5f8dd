//! Identity-provider seam.
//!
//! An identity provider is an opaque capability that produces a verified
//! name/email claim. Which provider backs it (and how its popup works) is
//! outside this app; the flows only ever see the assertion or a failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use quickbite_core::Email;

/// A verified name/email claim obtained from an identity provider,
/// substituting for a local password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityAssertion {
    /// The display name the provider asserts.
    pub display_name: String,
    /// The email address the provider verified.
    pub email: Email,
}

/// Failures of the identity-provider hand-off.
///
/// Provider details are never surfaced to the user; every variant maps to
/// a generic message at the flow boundary.
#[derive(Debug, Clone, Copy, Error)]
pub enum ProviderError {
    /// The user dismissed the provider hand-off.
    #[error("identity request was cancelled")]
    Cancelled,
    /// The provider failed to produce an assertion.
    #[error("identity provider failed")]
    Failed,
}

/// An identity provider the authentication flow can consult.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Ask the provider for a verified identity assertion.
    async fn request_assertion(&self) -> Result<IdentityAssertion, ProviderError>;
}

/// Adapter for assertions the browser already obtained from the provider
/// popup.
///
/// The SPA runs the popup itself and posts the resulting claim; this
/// replays it as a one-shot provider so the flow still controls when the
/// provider is consulted (in particular, not before local validation).
#[derive(Debug, Clone)]
pub struct PostedAssertion(Option<IdentityAssertion>);

impl PostedAssertion {
    /// Wrap a posted claim; `None` means the popup was dismissed or
    /// failed client-side.
    #[must_use]
    pub const fn new(assertion: Option<IdentityAssertion>) -> Self {
        Self(assertion)
    }
}

impl IdentityProvider for PostedAssertion {
    async fn request_assertion(&self) -> Result<IdentityAssertion, ProviderError> {
        self.0.clone().ok_or(ProviderError::Cancelled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_posted_assertion_replays_claim() {
        let assertion = IdentityAssertion {
            display_name: "Asha Patel".to_owned(),
            email: Email::parse("asha@example.com").unwrap(),
        };
        let provider = PostedAssertion::new(Some(assertion));

        let replayed = provider.request_assertion().await.unwrap();
        assert_eq!(replayed.display_name, "Asha Patel");
    }

    #[tokio::test]
    async fn test_posted_assertion_absent_is_cancelled() {
        let provider = PostedAssertion::new(None);
        assert!(matches!(
            provider.request_assertion().await,
            Err(ProviderError::Cancelled)
        ));
    }
}

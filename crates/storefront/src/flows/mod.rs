//! Client-observable state machines for authentication and credential
//! recovery.
//!
//! Both flows are driven the same way: the caller edits fields, then
//! submits; the flow validates locally first (local failures never reach
//! the network), calls the Account Service through the [`AccountApi`]
//! context it is handed, and settles into a new state or an error string.
//! No flow operation panics or escapes an error past the flow boundary,
//! and no failure is retried automatically - every attempt is terminal.
//!
//! [`AccountApi`]: crate::account::AccountApi

pub mod auth;
pub mod recovery;

pub use auth::{AuthFlow, AuthStatus, SignInForm, SignUpForm};
pub use recovery::{RecoveryFlow, RecoveryStage};

/// Result of driving a flow one submission forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The wizard advanced exactly one stage.
    Advanced,
    /// A session-establishing call succeeded; the caller now holds an
    /// authenticated identity.
    SignedIn,
    /// The flow finished; the caller should continue on the sign-in
    /// surface.
    RedirectToSignIn,
    /// The attempt failed locally or at the service; the flow did not
    /// move and its latest error says why.
    Stayed,
}

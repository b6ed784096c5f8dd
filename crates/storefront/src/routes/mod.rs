//! HTTP route handlers for the storefront API.
//!
//! The SPA is the only client; every surface speaks JSON.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//!
//! # Auth
//! POST /api/auth/signup           - Password sign-up
//! POST /api/auth/signin           - Password sign-in
//! POST /api/auth/identity/signup  - Identity-assertion sign-up
//! POST /api/auth/identity/signin  - Identity-assertion sign-in
//! POST /api/auth/logout           - Sign out
//! GET  /api/auth/me               - Current signed-in account
//!
//! # Credential recovery (three-step wizard)
//! GET  /api/recovery              - Wizard state
//! POST /api/recovery/email        - Step 1: request an OTP
//! POST /api/recovery/otp          - Step 2: verify the OTP
//! POST /api/recovery/password     - Step 3: set the new password
//!
//! # Dashboard (surface one of the cart)
//! GET  /api/dashboard             - Menu + cart badge totals
//!
//! # Cart (surface two; requires auth)
//! GET  /api/cart                  - Cart page view
//! POST /api/cart/add              - Add an item (or increment its line)
//! POST /api/cart/quantity         - Apply a signed quantity delta
//! POST /api/cart/remove           - Remove a line
//! GET  /api/cart/count            - Cart badge count
//! ```

pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod recovery;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::Mutex;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::Result;
use crate::models::session_keys;
use crate::state::{AppState, BrowsingState};

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::sign_up))
        .route("/signin", post(auth::sign_in))
        .route("/identity/signup", post(auth::identity_sign_up))
        .route("/identity/signin", post(auth::identity_sign_in))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the credential-recovery routes router.
pub fn recovery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recovery::show))
        .route("/email", post(recovery::submit_email))
        .route("/otp", post(recovery::submit_otp))
        .route("/password", post(recovery::submit_password))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/quantity", post(cart::quantity))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Dashboard (menu + cart badge)
        .route("/api/dashboard", get(dashboard::show))
        // Auth routes
        .nest("/api/auth", auth_routes())
        // Recovery wizard
        .nest("/api/recovery", recovery_routes())
        // Cart routes
        .nest("/api/cart", cart_routes())
}

/// Get-or-create the key tying this cookie session to its browsing state.
pub(crate) async fn browsing_key(session: &Session) -> Result<String> {
    if let Some(key) = session.get::<String>(session_keys::BROWSING_KEY).await? {
        return Ok(key);
    }

    let key = Uuid::new_v4().to_string();
    session.insert(session_keys::BROWSING_KEY, &key).await?;
    Ok(key)
}

/// Fetch this session's browsing state (cart + wizards).
pub(crate) async fn browsing_state(
    state: &AppState,
    session: &Session,
) -> Result<Arc<Mutex<BrowsingState>>> {
    let key = browsing_key(session).await?;
    Ok(state.sessions().get(&key).await)
}

//! Integration tests for Quickbite.
//!
//! Each test boots the real storefront router on an ephemeral port with
//! the Account Service replaced by a per-test [`wiremock::MockServer`],
//! then drives it with a cookie-enabled `reqwest` client - the same way
//! the SPA talks to it.
//!
//! # Test Categories
//!
//! - `auth_flows` - Sign-up/sign-in paths and the error-message tiers
//! - `recovery_flow` - The three-step OTP wizard
//! - `cart_surfaces` - Cart mutations observed through both surfaces

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quickbite_storefront::catalog::Catalog;
use quickbite_storefront::config::{AccountServiceConfig, QuickbiteConfig};
use quickbite_storefront::middleware::create_session_layer;
use quickbite_storefront::routes;
use quickbite_storefront::state::AppState;

/// A running storefront instance plus its mocked Account Service.
pub struct TestApp {
    /// Base URL of the storefront under test.
    pub address: String,
    /// Cookie-enabled client, one browsing session per `TestApp`.
    pub client: reqwest::Client,
    /// The mocked Account Service.
    pub account_service: MockServer,
}

impl TestApp {
    /// Boot the storefront on an ephemeral port, pointed at a fresh mock
    /// Account Service.
    ///
    /// # Panics
    ///
    /// Panics if the app cannot be started; tests cannot proceed anyway.
    #[allow(clippy::expect_used)]
    pub async fn spawn() -> Self {
        let account_service = MockServer::start().await;

        let config = QuickbiteConfig {
            host: "127.0.0.1".parse().expect("loopback address"),
            port: 0,
            base_url: "http://localhost".to_owned(),
            frontend_origin: "http://localhost:5173".to_owned(),
            session_secret: SecretString::from(
                "NQ7rP2vX9aK4mW8dF3hJ6sL1bC5nT0gZyE4uR7iO2pA9",
            ),
            account: AccountServiceConfig {
                base_url: Url::parse(&account_service.uri()).expect("mock server uri"),
            },
            sentry_dsn: None,
        };

        let state =
            AppState::new(config, Catalog::sample_menu()).expect("application state");
        let session_layer = create_session_layer(state.config());
        let app = Router::new()
            .merge(routes::routes())
            .layer(session_layer)
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let address = format!("http://{}", listener.local_addr().expect("local addr"));

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("reqwest client");

        Self {
            address,
            client,
            account_service,
        }
    }

    /// Full URL for a storefront path.
    #[must_use]
    pub fn url(&self, api_path: &str) -> String {
        format!("{}{api_path}", self.address)
    }

    /// Sign in through the real surface against a mocked service
    /// response, establishing this client's session.
    ///
    /// # Panics
    ///
    /// Panics if the sign-in round trip fails.
    #[allow(clippy::expect_used)]
    pub async fn sign_in(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/signin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(account_record()))
            .mount(&self.account_service)
            .await;

        let response = self
            .client
            .post(self.url("/api/auth/signin"))
            .json(&serde_json::json!({
                "email": "asha@example.com",
                "password": "plenty-long-password"
            }))
            .send()
            .await
            .expect("sign-in request");

        assert_eq!(response.status(), 200, "sign-in should succeed");
    }
}

/// The account record the mocked service hands back, in the service's
/// own wire format (legacy role spelling included).
#[must_use]
pub fn account_record() -> serde_json::Value {
    serde_json::json!({
        "_id": "66f2a1b3c4d5e6f7a8b9c0d1",
        "fullName": "Asha Patel",
        "email": "asha@example.com",
        "mobile": "5550100",
        "role": "user",
        "createdAt": "2025-11-02T09:30:00Z",
        "updatedAt": "2025-11-02T09:30:00Z"
    })
}

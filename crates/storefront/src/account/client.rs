//! Account Service HTTP client implementation.
//!
//! Plain JSON over `reqwest`. The client keeps a cookie store so the
//! service's session cookie rides on every subsequent call.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::AccountServiceConfig;

use super::types::{IdentityAuthRequest, SessionAccount, SignInRequest, SignUpRequest};
use super::{AccountApi, AccountError, extract_message};

/// Client for the Quickbite Account Service.
///
/// Cheaply cloneable; all clones share one connection pool and cookie
/// store.
#[derive(Clone)]
pub struct AccountClient {
    inner: Arc<AccountClientInner>,
}

struct AccountClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AccountClient {
    /// Create a new Account Service client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &AccountServiceConfig) -> Result<Self, AccountError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            inner: Arc::new(AccountClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// POST a JSON body and decode a JSON response.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AccountError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// POST a JSON body where only the status matters.
    async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), AccountError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .inner
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

/// Map a non-success response to [`AccountError::Status`], reading the
/// body once so a carried message survives for the three-tier policy.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AccountError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(%status, body = %body.chars().take(200).collect::<String>(), "account service error response");

    Err(AccountError::Status {
        status,
        message: extract_message(&body),
    })
}

impl AccountApi for AccountClient {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SessionAccount, AccountError> {
        self.post_json("/api/auth/signup", request).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn sign_in(&self, request: &SignInRequest) -> Result<SessionAccount, AccountError> {
        self.post_json("/api/auth/signin", request).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn identity_auth(
        &self,
        request: &IdentityAuthRequest,
    ) -> Result<SessionAccount, AccountError> {
        self.post_json("/api/auth/identity", request).await
    }

    #[instrument(skip(self))]
    async fn send_otp(&self, email: &str) -> Result<(), AccountError> {
        self.post_unit("/api/auth/send-otp", &serde_json::json!({ "email": email }))
            .await
    }

    #[instrument(skip(self, otp))]
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), AccountError> {
        self.post_unit(
            "/api/auth/verify-otp",
            &serde_json::json!({ "email": email, "otp": otp }),
        )
        .await
    }

    #[instrument(skip(self, new_password))]
    async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AccountError> {
        self.post_unit(
            "/api/auth/reset-password",
            &serde_json::json!({ "email": email, "newPassword": new_password }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn current_session(&self) -> Option<SessionAccount> {
        let response = self
            .inner
            .client
            .get(self.endpoint("/api/user/current"))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "no current session");
            return None;
        }

        response.json().await.ok()
    }
}

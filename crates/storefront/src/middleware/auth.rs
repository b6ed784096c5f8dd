//! Authentication extractor.
//!
//! Handlers that take a [`CurrentAccount`] parameter require a signed-in
//! session and reject anonymous requests with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentAccount, session_keys};

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::Internal(message.to_owned()))?;

        session
            .get::<Self>(session_keys::CURRENT_ACCOUNT)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Sign in to continue.".to_owned()))
    }
}

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::AppError;

/// Identity of the caller, verified from the bearer token.
///
/// Taking this as a handler argument puts the route behind the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

/// Pulls the credential out of `Authorization: <scheme> <token>`.
pub(crate) fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AppError> {
    let raw = header.ok_or(AppError::MissingCredential)?;
    let raw = raw.to_str().map_err(|_| AppError::MalformedCredential)?;
    match raw.split(' ').nth(1) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::MalformedCredential),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<JwtKeys>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts.headers.get(AUTHORIZATION)).map_err(|e| {
            warn!(uri = %parts.uri, reason = %e, "rejected credential");
            e
        })?;

        let keys = Arc::<JwtKeys>::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(uri = %parts.uri, "invalid or expired token");
            e
        })?;

        Ok(AuthUser(claims.user_id()))
    }
}

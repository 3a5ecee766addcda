use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::db::StoreError;

/// Every failure a request can end in. Rendered as `{ "msg": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No token, authorization denied")]
    MissingCredential,

    #[error("Token format is \"Bearer <token>\"")]
    MalformedCredential,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("User not authorized")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::MissingCredential
            | AppError::MalformedCredential
            | AppError::InvalidToken
            | AppError::Forbidden => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(what) => AppError::Conflict(what),
            StoreError::Backend(e) => AppError::Internal(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = match &self {
            AppError::Upstream(detail) => {
                error!(error = %detail, "upstream request failed");
                "Server Error".to_string()
            }
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "Server Error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "msg": msg }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn auth_failures_are_all_401_with_distinct_messages() {
        let (s1, b1) = body_json(AppError::MissingCredential).await;
        let (s2, b2) = body_json(AppError::MalformedCredential).await;
        let (s3, b3) = body_json(AppError::InvalidToken).await;
        assert_eq!(s1, StatusCode::UNAUTHORIZED);
        assert_eq!(s2, StatusCode::UNAUTHORIZED);
        assert_eq!(s3, StatusCode::UNAUTHORIZED);
        assert_eq!(b1["msg"], "No token, authorization denied");
        assert_eq!(b2["msg"], "Token format is \"Bearer <token>\"");
        assert_eq!(b3["msg"], "Token is not valid");
    }

    #[tokio::test]
    async fn forbidden_keeps_reference_status() {
        let (status, body) = body_json(AppError::Forbidden).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], "User not authorized");
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let (status, body) =
            body_json(AppError::Internal(anyhow::anyhow!("password=hunter2 leaked"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["msg"], "Server Error");

        let (status, body) = body_json(AppError::Upstream("tmdb said 503".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["msg"], "Server Error");
    }

    #[test]
    fn store_conflict_maps_to_conflict() {
        let err: AppError = StoreError::Conflict("duplicate".into()).into();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "duplicate"));
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: AppError = StoreError::Backend(anyhow::anyhow!("boom")).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest, RegisterResponse, TokenResponse},
        extractors::AuthUser,
        services,
    },
    error::AppResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(payload) = payload?;
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let (user, token) =
        services::register(state.users.as_ref(), &state.jwt, &email, &password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            msg: "User registered successfully",
            user_id: user.id,
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(payload) = payload?;
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let (_, token) = services::login(state.users.as_ref(), &state.jwt, &email, &password).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = services::current_user(state.users.as_ref(), user_id).await?;
    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}

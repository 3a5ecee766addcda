use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{MovieSummary, SearchQuery};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/movies/search", get(search_movies))
}

/// Only needs a valid caller; nothing owned is touched.
#[instrument(skip(state, _user))]
pub async fn search_movies(
    State(state): State<AppState>,
    _user: AuthUser,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let Query(params) = params?;
    let query = params
        .query
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::validation("Search query is required"))?;

    let movies = state
        .movies
        .search(&query)
        .await
        .map_err(|e| AppError::Upstream(format!("{e:#}")))?;
    Ok(Json(movies))
}

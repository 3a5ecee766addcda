use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

use super::dto::{
    AddMovieRequest, CreateWatchlistRequest, MessageResponse, UpdateWatchlistRequest,
    WatchlistView,
};
use super::ownership::WATCHLIST_NOT_FOUND;
use super::repo_types::WatchlistMovie;
use super::services;

pub fn watchlist_routes() -> Router<AppState> {
    Router::new()
        .route("/watchlists", get(list_watchlists).post(create_watchlist))
        .route(
            "/watchlists/:id",
            get(get_watchlist)
                .put(update_watchlist)
                .delete(delete_watchlist),
        )
}

pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/watchlists/:id/movies", post(add_movie))
        .route("/watchlists/:id/movies/:movie_id", delete(remove_movie))
}

/// A path that cannot even be decoded names no watchlist.
fn segments<T>(path: Result<Path<T>, PathRejection>) -> AppResult<T> {
    path.map(|Path(p)| p)
        .map_err(|_| AppError::not_found(WATCHLIST_NOT_FOUND))
}

/// An id that cannot be a watchlist simply does not exist.
fn watchlist_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(WATCHLIST_NOT_FOUND))
}

fn movie_id(raw: &str) -> AppResult<i32> {
    raw.parse::<i32>()
        .map_err(|_| AppError::validation("movieId must be an integer"))
}

#[instrument(skip(state))]
pub async fn list_watchlists(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<WatchlistView>>> {
    let lists = services::list_watchlists(state.watchlists.as_ref(), user_id).await?;
    Ok(Json(lists))
}

#[instrument(skip(state, payload))]
pub async fn create_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateWatchlistRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<WatchlistView>)> {
    let Json(body) = payload?;
    let view = services::create_watchlist(
        state.watchlists.as_ref(),
        user_id,
        body.name.as_deref(),
        body.description.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(skip(state))]
pub async fn get_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<WatchlistView>> {
    let id = watchlist_id(&segments(id)?)?;
    let view = services::get_watchlist(state.watchlists.as_ref(), user_id, id).await?;
    Ok(Json(view))
}

#[instrument(skip(state, payload))]
pub async fn update_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateWatchlistRequest>, JsonRejection>,
) -> AppResult<Json<WatchlistView>> {
    let id = watchlist_id(&segments(id)?)?;
    let Json(body) = payload?;
    let description = body.description.as_ref().map(|d| d.as_deref());
    let view = services::update_watchlist(
        state.watchlists.as_ref(),
        user_id,
        id,
        body.name.as_deref(),
        description,
    )
    .await?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn delete_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let id = watchlist_id(&segments(id)?)?;
    services::delete_watchlist(state.watchlists.as_ref(), user_id, id).await?;
    Ok(Json(MessageResponse {
        msg: "Watchlist removed",
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_movie(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<AddMovieRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<WatchlistMovie>)> {
    let id = watchlist_id(&segments(id)?)?;
    let Json(body) = payload?;
    let movie = services::add_movie(
        state.watchlists.as_ref(),
        user_id,
        id,
        body.movie_id,
        body.movie_title.as_deref(),
        body.poster_path.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

#[instrument(skip(state))]
pub async fn remove_movie(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<(String, String)>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let (id, movie) = segments(path)?;
    let id = watchlist_id(&id)?;
    let movie = movie_id(&movie)?;
    services::remove_movie(state.watchlists.as_ref(), user_id, id, movie).await?;
    Ok(Json(MessageResponse {
        msg: "Movie removed from watchlist",
    }))
}

mod dto;
pub mod handlers;
pub mod ownership;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::watchlist_routes())
        .merge(handlers::movie_routes())
}

pub mod client;
mod dto;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub use client::{MovieSearch, TmdbClient};
pub use dto::MovieSummary;

pub fn router() -> Router<AppState> {
    handlers::search_routes()
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Watchlist {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub user_id: Uuid, // owner, never changes
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A movie inside a watchlist. Title and poster are copied at insert time
/// and not refreshed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistMovie {
    pub id: Uuid,
    pub watchlist_id: Uuid,
    pub movie_id: i32,
    pub movie_title: String,
    pub poster_path: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy)]
pub struct NewWatchlistMovie<'a> {
    pub watchlist_id: Uuid,
    pub movie_id: i32,
    pub movie_title: &'a str,
    pub poster_path: &'a str,
}

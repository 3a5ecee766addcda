use serde::{Deserialize, Deserializer, Serialize};

use crate::watchlists::repo_types::{Watchlist, WatchlistMovie};

#[derive(Debug, Deserialize)]
pub struct CreateWatchlistRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `description`: absent keeps the current value, `null` clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateWatchlistRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieRequest {
    #[serde(default)]
    pub movie_id: Option<i32>,
    #[serde(default)]
    pub movie_title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// A watchlist together with its movies, newest first.
#[derive(Debug, Serialize)]
pub struct WatchlistView {
    #[serde(flatten)]
    pub watchlist: Watchlist,
    pub movies: Vec<WatchlistMovie>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: &'static str,
}

fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

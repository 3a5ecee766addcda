use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    db::StoreError,
    error::{AppError, AppResult},
    watchlists::{
        dto::WatchlistView,
        ownership::load_owned,
        repo::WatchlistRepo,
        repo_types::{NewWatchlistMovie, Watchlist, WatchlistMovie},
    },
};

const NAME_REQUIRED: &str = "Please provide a name for the watchlist";
const MOVIE_FIELDS_REQUIRED: &str = "Please provide movieId, movieTitle, and posterPath";
const MOVIE_ALREADY_PRESENT: &str = "Movie is already in this watchlist.";
const MOVIE_NOT_FOUND: &str = "Movie not found in this watchlist";

fn require_name(name: Option<&str>) -> AppResult<&str> {
    match name {
        Some(n) if !n.is_empty() => Ok(n),
        _ => Err(AppError::validation(NAME_REQUIRED)),
    }
}

/// Pairs each watchlist with its movies using a single store query.
async fn attach_movies(
    repo: &dyn WatchlistRepo,
    watchlists: Vec<Watchlist>,
) -> AppResult<Vec<WatchlistView>> {
    let ids: Vec<Uuid> = watchlists.iter().map(|w| w.id).collect();
    let mut grouped: HashMap<Uuid, Vec<WatchlistMovie>> = HashMap::new();
    for movie in repo.movies_for(&ids).await? {
        grouped.entry(movie.watchlist_id).or_default().push(movie);
    }
    Ok(watchlists
        .into_iter()
        .map(|watchlist| WatchlistView {
            movies: grouped.remove(&watchlist.id).unwrap_or_default(),
            watchlist,
        })
        .collect())
}

async fn with_movies(repo: &dyn WatchlistRepo, watchlist: Watchlist) -> AppResult<WatchlistView> {
    let movies = repo.movies_for(&[watchlist.id]).await?;
    Ok(WatchlistView { watchlist, movies })
}

pub async fn create_watchlist(
    repo: &dyn WatchlistRepo,
    caller: Uuid,
    name: Option<&str>,
    description: Option<&str>,
) -> AppResult<WatchlistView> {
    let name = require_name(name)?;
    let watchlist = repo.create(caller, name, description).await?;
    info!(watchlist_id = %watchlist.id, user_id = %caller, "watchlist created");
    Ok(WatchlistView {
        watchlist,
        movies: Vec::new(),
    })
}

/// `description`: `None` keeps it, `Some(None)` clears it, `Some(Some(_))` replaces it.
pub async fn update_watchlist(
    repo: &dyn WatchlistRepo,
    caller: Uuid,
    watchlist_id: Uuid,
    name: Option<&str>,
    description: Option<Option<&str>>,
) -> AppResult<WatchlistView> {
    let name = require_name(name)?;
    let current = load_owned(repo, caller, watchlist_id).await?;

    let description = match description {
        Some(d) => d,
        None => current.description.as_deref(),
    };
    let updated = repo
        .update(watchlist_id, name, description)
        .await?
        .ok_or_else(|| AppError::not_found(super::ownership::WATCHLIST_NOT_FOUND))?;

    info!(%watchlist_id, user_id = %caller, "watchlist updated");
    with_movies(repo, updated).await
}

pub async fn list_watchlists(
    repo: &dyn WatchlistRepo,
    caller: Uuid,
) -> AppResult<Vec<WatchlistView>> {
    let watchlists = repo.list_by_user(caller).await?;
    attach_movies(repo, watchlists).await
}

pub async fn get_watchlist(
    repo: &dyn WatchlistRepo,
    caller: Uuid,
    watchlist_id: Uuid,
) -> AppResult<WatchlistView> {
    let watchlist = load_owned(repo, caller, watchlist_id).await?;
    with_movies(repo, watchlist).await
}

/// Movies go first so no membership is ever left without its watchlist.
pub async fn delete_watchlist(
    repo: &dyn WatchlistRepo,
    caller: Uuid,
    watchlist_id: Uuid,
) -> AppResult<()> {
    load_owned(repo, caller, watchlist_id).await?;
    let removed = repo.remove_all_movies(watchlist_id).await?;
    repo.delete(watchlist_id).await?;
    info!(%watchlist_id, user_id = %caller, movies = removed, "watchlist deleted");
    Ok(())
}

pub async fn add_movie(
    repo: &dyn WatchlistRepo,
    caller: Uuid,
    watchlist_id: Uuid,
    movie_id: Option<i32>,
    movie_title: Option<&str>,
    poster_path: Option<&str>,
) -> AppResult<WatchlistMovie> {
    let (movie_id, movie_title, poster_path) = match (movie_id, movie_title, poster_path) {
        (Some(id), Some(title), Some(poster)) if id != 0 && !title.is_empty() => {
            (id, title, poster)
        }
        _ => return Err(AppError::validation(MOVIE_FIELDS_REQUIRED)),
    };

    load_owned(repo, caller, watchlist_id).await?;

    let added = repo
        .add_movie(NewWatchlistMovie {
            watchlist_id,
            movie_id,
            movie_title,
            poster_path,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => {
                warn!(%watchlist_id, movie_id, "movie already in watchlist");
                AppError::conflict(MOVIE_ALREADY_PRESENT)
            }
            other => other.into(),
        })?;

    info!(%watchlist_id, movie_id, user_id = %caller, "movie added");
    Ok(added)
}

pub async fn remove_movie(
    repo: &dyn WatchlistRepo,
    caller: Uuid,
    watchlist_id: Uuid,
    movie_id: i32,
) -> AppResult<()> {
    load_owned(repo, caller, watchlist_id).await?;
    if repo.remove_movie(watchlist_id, movie_id).await? == 0 {
        return Err(AppError::not_found(MOVIE_NOT_FOUND));
    }
    info!(%watchlist_id, movie_id, user_id = %caller, "movie removed");
    Ok(())
}

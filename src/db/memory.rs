//! In-process stand-in for Postgres used by unit tests.
//!
//! Enforces the same unique indexes and the `watchlist_movies -> watchlists`
//! foreign key as `migrations/0001_init.sql`. Rows are kept in insertion
//! order, so "newest first" is simply reverse order.

use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::auth::{repo::UserRepo, repo_types::User};
use crate::watchlists::{
    repo::WatchlistRepo,
    repo_types::{NewWatchlistMovie, Watchlist, WatchlistMovie},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    watchlists: Vec<Watchlist>,
    movies: Vec<WatchlistMovie>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut guard = self.tables.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut guard)
    }

    pub fn movie_rows(&self, watchlist_id: Uuid) -> usize {
        self.with(|t| {
            t.movies
                .iter()
                .filter(|m| m.watchlist_id == watchlist_id)
                .count()
        })
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.with(|t| t.users.iter().find(|u| u.email == email).cloned()))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.with(|t| t.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn create(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        self.with(|t| {
            if t.users.iter().any(|u| u.email == email) {
                return Err(StoreError::Conflict("users_email_key".into()));
            }
            let user = User {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: OffsetDateTime::now_utc(),
            };
            t.users.push(user.clone());
            Ok(user)
        })
    }
}

#[async_trait]
impl WatchlistRepo for MemoryStore {
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<Watchlist> {
        let watchlist = Watchlist {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.map(str::to_string),
            user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        self.with(|t| t.watchlists.push(watchlist.clone()));
        Ok(watchlist)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Watchlist>> {
        Ok(self.with(|t| t.watchlists.iter().find(|w| w.id == id).cloned()))
    }

    async fn list_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Watchlist>> {
        Ok(self.with(|t| {
            t.watchlists
                .iter()
                .rev()
                .filter(|w| w.user_id == user_id)
                .cloned()
                .collect()
        }))
    }

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<Option<Watchlist>> {
        Ok(self.with(|t| {
            t.watchlists.iter_mut().find(|w| w.id == id).map(|w| {
                w.name = name.to_string();
                w.description = description.map(str::to_string);
                w.clone()
            })
        }))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<u64> {
        self.with(|t| {
            if t.movies.iter().any(|m| m.watchlist_id == id) {
                return Err(StoreError::Backend(anyhow!(
                    "watchlist_movies_watchlist_id_fkey violated"
                )));
            }
            let before = t.watchlists.len();
            t.watchlists.retain(|w| w.id != id);
            Ok((before - t.watchlists.len()) as u64)
        })
    }

    async fn add_movie(&self, movie: NewWatchlistMovie<'_>) -> StoreResult<WatchlistMovie> {
        self.with(|t| {
            if !t.watchlists.iter().any(|w| w.id == movie.watchlist_id) {
                return Err(StoreError::Backend(anyhow!(
                    "watchlist_movies_watchlist_id_fkey violated"
                )));
            }
            if t
                .movies
                .iter()
                .any(|m| m.watchlist_id == movie.watchlist_id && m.movie_id == movie.movie_id)
            {
                return Err(StoreError::Conflict(
                    "watchlist_movies_watchlist_movie_key".into(),
                ));
            }
            let row = WatchlistMovie {
                id: Uuid::new_v4(),
                watchlist_id: movie.watchlist_id,
                movie_id: movie.movie_id,
                movie_title: movie.movie_title.to_string(),
                poster_path: movie.poster_path.to_string(),
                created_at: OffsetDateTime::now_utc(),
            };
            t.movies.push(row.clone());
            Ok(row)
        })
    }

    async fn movies_for(&self, watchlist_ids: &[Uuid]) -> StoreResult<Vec<WatchlistMovie>> {
        Ok(self.with(|t| {
            t.movies
                .iter()
                .rev()
                .filter(|m| watchlist_ids.contains(&m.watchlist_id))
                .cloned()
                .collect()
        }))
    }

    async fn remove_movie(&self, watchlist_id: Uuid, movie_id: i32) -> StoreResult<u64> {
        Ok(self.with(|t| {
            let before = t.movies.len();
            t.movies
                .retain(|m| !(m.watchlist_id == watchlist_id && m.movie_id == movie_id));
            (before - t.movies.len()) as u64
        }))
    }

    async fn remove_all_movies(&self, watchlist_id: Uuid) -> StoreResult<u64> {
        Ok(self.with(|t| {
            let before = t.movies.len();
            t.movies.retain(|m| m.watchlist_id != watchlist_id);
            (before - t.movies.len()) as u64
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::default();
        UserRepo::create(&store, "a@x.com", "h").await.unwrap();
        let err = UserRepo::create(&store, "a@x.com", "h").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn watchlist_with_movies_cannot_be_deleted_first() {
        let store = MemoryStore::default();
        let w = WatchlistRepo::create(&store, Uuid::new_v4(), "w", None)
            .await
            .unwrap();
        store
            .add_movie(NewWatchlistMovie {
                watchlist_id: w.id,
                movie_id: 1,
                movie_title: "t",
                poster_path: "",
            })
            .await
            .unwrap();

        assert!(matches!(
            WatchlistRepo::delete(&store, w.id).await,
            Err(StoreError::Backend(_))
        ));
        assert_eq!(store.remove_all_movies(w.id).await.unwrap(), 1);
        assert_eq!(WatchlistRepo::delete(&store, w.id).await.unwrap(), 1);
    }
}

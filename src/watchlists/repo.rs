use async_trait::async_trait;
use uuid::Uuid;

use crate::db::{PgStore, StoreError, StoreResult};
use crate::watchlists::repo_types::{NewWatchlistMovie, Watchlist, WatchlistMovie};

/// Persistence for watchlists and their movies.
///
/// Lists come back newest first. No method checks ownership; that is the
/// caller's job.
#[async_trait]
pub trait WatchlistRepo: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<Watchlist>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Watchlist>>;
    async fn list_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Watchlist>>;
    /// `None` when the row no longer exists.
    async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<Option<Watchlist>>;
    async fn delete(&self, id: Uuid) -> StoreResult<u64>;

    /// Fails with [`StoreError::Conflict`] if the movie is already in the list.
    async fn add_movie(&self, movie: NewWatchlistMovie<'_>) -> StoreResult<WatchlistMovie>;
    async fn movies_for(&self, watchlist_ids: &[Uuid]) -> StoreResult<Vec<WatchlistMovie>>;
    async fn remove_movie(&self, watchlist_id: Uuid, movie_id: i32) -> StoreResult<u64>;
    async fn remove_all_movies(&self, watchlist_id: Uuid) -> StoreResult<u64>;
}

#[async_trait]
impl WatchlistRepo for PgStore {
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<Watchlist> {
        sqlx::query_as::<_, Watchlist>(
            r#"
            INSERT INTO watchlists (id, user_id, name, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "create watchlist"))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Watchlist>> {
        sqlx::query_as::<_, Watchlist>(
            r#"
            SELECT id, name, description, user_id, created_at
            FROM watchlists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "find watchlist"))
    }

    async fn list_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Watchlist>> {
        sqlx::query_as::<_, Watchlist>(
            r#"
            SELECT id, name, description, user_id, created_at
            FROM watchlists
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "list watchlists"))
    }

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<Option<Watchlist>> {
        sqlx::query_as::<_, Watchlist>(
            r#"
            UPDATE watchlists
               SET name = $2, description = $3
             WHERE id = $1
            RETURNING id, name, description, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "update watchlist"))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<u64> {
        let res = sqlx::query(r#"DELETE FROM watchlists WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "delete watchlist"))?;
        Ok(res.rows_affected())
    }

    async fn add_movie(&self, movie: NewWatchlistMovie<'_>) -> StoreResult<WatchlistMovie> {
        sqlx::query_as::<_, WatchlistMovie>(
            r#"
            INSERT INTO watchlist_movies (id, watchlist_id, movie_id, movie_title, poster_path)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, watchlist_id, movie_id, movie_title, poster_path, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(movie.watchlist_id)
        .bind(movie.movie_id)
        .bind(movie.movie_title)
        .bind(movie.poster_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "add movie"))
    }

    async fn movies_for(&self, watchlist_ids: &[Uuid]) -> StoreResult<Vec<WatchlistMovie>> {
        if watchlist_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, WatchlistMovie>(
            r#"
            SELECT id, watchlist_id, movie_id, movie_title, poster_path, created_at
              FROM watchlist_movies
             WHERE watchlist_id = ANY($1)
             ORDER BY created_at DESC
            "#,
        )
        .bind(watchlist_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "list watchlist movies"))
    }

    async fn remove_movie(&self, watchlist_id: Uuid, movie_id: i32) -> StoreResult<u64> {
        let res = sqlx::query(
            r#"DELETE FROM watchlist_movies WHERE watchlist_id = $1 AND movie_id = $2"#,
        )
        .bind(watchlist_id)
        .bind(movie_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "remove movie"))?;
        Ok(res.rows_affected())
    }

    async fn remove_all_movies(&self, watchlist_id: Uuid) -> StoreResult<u64> {
        let res = sqlx::query(r#"DELETE FROM watchlist_movies WHERE watchlist_id = $1"#)
            .bind(watchlist_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "remove watchlist movies"))?;
        Ok(res.rows_affected())
    }
}

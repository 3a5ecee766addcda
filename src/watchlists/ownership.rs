//! Ownership checks for watchlists and, through their parent, memberships.

use tracing::warn;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::watchlists::{repo::WatchlistRepo, repo_types::Watchlist};

pub const WATCHLIST_NOT_FOUND: &str = "Watchlist not found";

/// A resource with exactly one owning user.
pub trait OwnedByUser {
    fn owner_id(&self) -> Uuid;

    fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id() == user_id
    }

    /// [`AppError::Forbidden`] unless `user_id` owns the resource.
    fn check_ownership(&self, user_id: Uuid) -> AppResult<()> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            warn!(owner_id = %self.owner_id(), requested_by = %user_id, "ownership check failed");
            Err(AppError::Forbidden)
        }
    }
}

impl OwnedByUser for Watchlist {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Loads a watchlist for `caller`: `NotFound` if it does not exist, then
/// `Forbidden` if someone else owns it. The order is observable.
pub async fn load_owned(
    repo: &dyn WatchlistRepo,
    caller: Uuid,
    watchlist_id: Uuid,
) -> AppResult<Watchlist> {
    let watchlist = repo
        .find_by_id(watchlist_id)
        .await?
        .ok_or_else(|| AppError::not_found(WATCHLIST_NOT_FOUND))?;
    watchlist.check_ownership(caller)?;
    Ok(watchlist)
}

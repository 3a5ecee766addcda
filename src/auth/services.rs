use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_against_dummy, verify_password},
        repo::UserRepo,
        repo_types::User,
    },
    db::StoreError,
    error::{AppError, AppResult},
};

const USER_EXISTS: &str = "User already exists";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Creates the account and signs the caller in.
pub async fn register(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> AppResult<(User, String)> {
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Please provide a valid email"));
    }
    if password.is_empty() {
        return Err(AppError::validation("Please provide a password"));
    }

    if users.find_by_email(email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::conflict(USER_EXISTS));
    }

    let hash = hash_password(password)?;
    // a concurrent registration can still win the race; the unique index decides
    let user = match users.create(email, &hash).await {
        Ok(u) => u,
        Err(StoreError::Conflict(_)) => {
            warn!(email = %email, "email registered concurrently");
            return Err(AppError::conflict(USER_EXISTS));
        }
        Err(e) => return Err(e.into()),
    };

    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((user, token))
}

/// Wrong password and unknown email fail identically.
pub async fn login(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> AppResult<(User, String)> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Please provide email and password"));
    }

    let Some(user) = users.find_by_email(email).await? else {
        verify_against_dummy(password);
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}

pub async fn current_user(users: &dyn UserRepo, user_id: Uuid) -> AppResult<User> {
    users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

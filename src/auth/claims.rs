use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity carried inside the token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimsUser {
    pub id: Uuid,
}

/// JWT payload: `{ "user": { "id": ... }, "iat": ..., "exp": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: ClaimsUser,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

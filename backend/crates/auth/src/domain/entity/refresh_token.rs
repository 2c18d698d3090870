//! Refresh Token Ledger Entry
//!
//! One row per issued refresh token. The token string itself is never kept;
//! rows are keyed by its digest.

use chrono::{DateTime, Utc};
use platform::crypto::token_digest;

use crate::domain::value_object::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token_digest: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn new(user_id: UserId, token: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            token_digest: token_digest(token),
            user_id,
            expires_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

// src/domain/credential.rs
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::constants::TOKEN_VALIDITY_HOURS;
use crate::util::text::abbreviate;

/// Response body of the token generation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    pub token: String,
    pub user_id: String,
}

/// Bearer token session with a client-computed expiry
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub user_id: String,
    pub expiry: DateTime<Utc>,
}

impl Credential {
    /// Build a credential from a fresh grant acquired at `now`
    pub fn from_grant(grant: TokenGrant, now: DateTime<Utc>) -> Self {
        Self {
            token: grant.token,
            user_id: grant.user_id,
            expiry: now + Duration::hours(TOKEN_VALIDITY_HOURS),
        }
    }

    /// Valid only while `now` is strictly before the expiry
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> &str {
        &self.token
    }
}

// Keep the token out of debug logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &abbreviate(&self.token, 4))
            .field("user_id", &self.user_id)
            .field("expiry", &self.expiry)
            .finish()
    }
}

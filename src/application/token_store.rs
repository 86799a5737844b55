// src/application/token_store.rs
use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, info, instrument, warn};

use crate::constants::{AUTH_FAILED_MESSAGE, AUTH_TOKEN_EXPIRY_KEY, AUTH_TOKEN_KEY, USER_ID_KEY};
use crate::domain::{Credential, DomainError, TokenGrant};

/// Durable client-side key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), DomainError>;
    fn remove(&mut self, key: &str) -> Result<(), DomainError>;
}

/// Anonymous token issuance on the backend
pub trait AuthApi {
    fn generate_token(&mut self) -> Result<TokenGrant, DomainError>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Supplies a bearer credential, reusing the cached one while it is valid.
///
/// The store is the only writer of the three credential keys in durable
/// storage. Acquisition is idempotent: after a failure it can simply be
/// invoked again.
pub struct TokenStore<S, A, C = SystemClock> {
    storage: S,
    api: A,
    clock: C,
    credential: Option<Credential>,
    error: Option<String>,
}

impl<S: KeyValueStore, A: AuthApi> TokenStore<S, A, SystemClock> {
    pub fn new(storage: S, api: A) -> Self {
        Self::with_clock(storage, api, SystemClock)
    }
}

impl<S: KeyValueStore, A: AuthApi, C: Clock> TokenStore<S, A, C> {
    pub fn with_clock(storage: S, api: A, clock: C) -> Self {
        Self {
            storage,
            api,
            clock,
            credential: None,
            error: None,
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Latest acquisition failure, cleared by the next success
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Return the cached credential when still valid, otherwise request a
    /// fresh one and persist it.
    ///
    /// On failure the credential is left unset and `error()` reports
    /// "Failed to generate authentication token".
    #[instrument(level = "debug", skip(self))]
    pub fn acquire_credential(&mut self) -> Result<Credential, DomainError> {
        let now = self.clock.now();

        match load_cached(&self.storage) {
            Ok(Some(cached)) if cached.is_valid_at(now) => {
                debug!(
                    user_id = %cached.user_id,
                    expiry = %cached.expiry,
                    "Using cached credential"
                );
                self.error = None;
                self.credential = Some(cached.clone());
                return Ok(cached);
            }
            Ok(Some(stale)) => debug!(expiry = %stale.expiry, "Cached credential expired"),
            Ok(None) => debug!("No cached credential"),
            Err(e) => warn!(error = %e, "Ignoring unreadable credential cache"),
        }

        match self.request_credential(now) {
            Ok(credential) => {
                self.error = None;
                self.credential = Some(credential.clone());
                Ok(credential)
            }
            Err(e) => {
                warn!(error = %e, "Token generation failed");
                self.credential = None;
                self.error = Some(AUTH_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    fn request_credential(&mut self, now: DateTime<Utc>) -> Result<Credential, DomainError> {
        let grant = self.api.generate_token()?;
        let credential = Credential::from_grant(grant, now);

        // The grant is usable even if it could not be cached.
        if let Err(e) = store_credential(&mut self.storage, &credential) {
            warn!(error = %e, "Failed to persist credential");
        }

        info!(
            user_id = %credential.user_id,
            expiry = %credential.expiry,
            "Generated new credential"
        );
        Ok(credential)
    }
}

/// Remove the three credential keys from storage
pub fn clear_credential<S: KeyValueStore>(storage: &mut S) -> Result<(), DomainError> {
    for key in [AUTH_TOKEN_KEY, USER_ID_KEY, AUTH_TOKEN_EXPIRY_KEY] {
        storage.remove(key)?;
    }
    Ok(())
}

fn load_cached<S: KeyValueStore>(storage: &S) -> Result<Option<Credential>, DomainError> {
    let read = |key: &str| -> Result<Option<String>, DomainError> {
        Ok(storage.get(key)?.filter(|value| !value.is_empty()))
    };

    let (Some(token), Some(user_id), Some(expiry)) = (
        read(AUTH_TOKEN_KEY)?,
        read(USER_ID_KEY)?,
        read(AUTH_TOKEN_EXPIRY_KEY)?,
    ) else {
        return Ok(None);
    };

    let Some(expiry) = parse_expiry(&expiry) else {
        debug!(%expiry, "Unparseable credential expiry");
        return Ok(None);
    };

    Ok(Some(Credential {
        token,
        user_id,
        expiry,
    }))
}

fn store_credential<S: KeyValueStore>(
    storage: &mut S,
    credential: &Credential,
) -> Result<(), DomainError> {
    storage.set(AUTH_TOKEN_KEY, &credential.token)?;
    storage.set(USER_ID_KEY, &credential.user_id)?;
    storage.set(
        AUTH_TOKEN_EXPIRY_KEY,
        &credential.expiry.timestamp_millis().to_string(),
    )?;
    Ok(())
}

fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    let millis = value.trim().parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

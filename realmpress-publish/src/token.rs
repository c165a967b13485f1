//! OAuth token cache and lifecycle state machine.
//!
//! Token health is one of four explicit states, classified in a single
//! place rather than ad hoc expiry checks at call sites:
//!
//! ```text
//! NoToken ──auth──▶ Valid ──expiry──▶ ExpiredRefreshable ──refresh ok──▶ Valid
//!                                        │
//!                                        └─refresh rejected──▶ ExpiredUnrefreshable ──auth──▶ Valid
//! ```
//!
//! `NoToken` and `ExpiredUnrefreshable` both require the interactive
//! consent flow behind [`Authenticator`].

use crate::error::{PublishError, PublishResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Treat tokens this close to expiry as already expired, so an upload
/// started now does not outlive its credential.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The persisted OAuth credential blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCache {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl TokenCache {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }
}

/// Token lifecycle state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenState {
    NoToken,
    Valid(TokenCache),
    ExpiredRefreshable(TokenCache),
    ExpiredUnrefreshable,
}

impl TokenState {
    /// Classifies a cached token as of `now`.
    pub fn classify(cache: Option<TokenCache>, now: DateTime<Utc>) -> Self {
        match cache {
            None => TokenState::NoToken,
            Some(cache) if !cache.is_expired_at(now) => TokenState::Valid(cache),
            Some(cache) if cache.refresh_token.is_some() => TokenState::ExpiredRefreshable(cache),
            Some(_) => TokenState::ExpiredUnrefreshable,
        }
    }

    /// True when the interactive consent flow is the only way forward.
    pub fn needs_interactive_auth(&self) -> bool {
        matches!(self, TokenState::NoToken | TokenState::ExpiredUnrefreshable)
    }
}

/// Seam for the interactive OAuth consent flow.
///
/// Invoked for `NoToken` and `ExpiredUnrefreshable`; a failure here is
/// fatal to the publish stage.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self) -> PublishResult<TokenCache>;
}

/// Persists the token cache as JSON.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> PublishResult<Option<TokenCache>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PublishError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn save(&self, cache: &TokenCache) -> PublishResult<()> {
        let raw = serde_json::to_string_pretty(cache)?;
        std::fs::write(&self.path, raw).map_err(|source| PublishError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn clear(&self) -> PublishResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PublishError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(expires_in_secs: i64, refreshable: bool) -> TokenCache {
        TokenCache {
            access_token: "at".into(),
            refresh_token: refreshable.then(|| "rt".to_string()),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    #[test]
    fn no_cache_is_no_token() {
        assert_eq!(TokenState::classify(None, Utc::now()), TokenState::NoToken);
        assert!(TokenState::NoToken.needs_interactive_auth());
    }

    #[test]
    fn fresh_token_is_valid() {
        let state = TokenState::classify(Some(cache(3600, true)), Utc::now());
        assert!(matches!(state, TokenState::Valid(_)));
        assert!(!state.needs_interactive_auth());
    }

    #[test]
    fn expired_with_refresh_token_is_refreshable() {
        let state = TokenState::classify(Some(cache(-10, true)), Utc::now());
        assert!(matches!(state, TokenState::ExpiredRefreshable(_)));
    }

    #[test]
    fn expired_without_refresh_token_needs_reauth() {
        let state = TokenState::classify(Some(cache(-10, false)), Utc::now());
        assert_eq!(state, TokenState::ExpiredUnrefreshable);
        assert!(state.needs_interactive_auth());
    }

    #[test]
    fn near_expiry_counts_as_expired() {
        let state = TokenState::classify(Some(cache(30, true)), Utc::now());
        assert!(matches!(state, TokenState::ExpiredRefreshable(_)));
    }

    #[test]
    fn store_round_trip_and_clear() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        assert!(store.load().unwrap().is_none());

        let cache = cache(3600, true);
        store.save(&cache).unwrap();
        assert_eq!(store.load().unwrap(), Some(cache));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}

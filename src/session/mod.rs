//! Ephemeral bearer-token sessions
//!
//! A session maps `session:<token>` to a JSON snapshot of the user who
//! logged in. Validity is established only by presence in the cache; the
//! token itself carries no identity.
pub mod memory;

pub use memory::MemorySessionCache;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Error, Result};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};

/// How long a session stays valid after login
pub const SESSION_TTL: Duration = Duration::from_secs(86400);

const TOKEN_BYTES: usize = 32;

/// Key-value store with per-key expiry.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Backend name reported by the health endpoint
    fn name(&self) -> &'static str;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), Error>;

    /// Returns `None` for missing or expired keys.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Returns whether a live entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, Error>;
}

/// Snapshot of the user stored with a session. May go stale if the
/// account changes after login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
}

pub fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

/// Generate an unguessable token from the OS random source.
pub fn mint_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Typed session operations over an optional cache backend. Without a
/// backend no session can ever be validated.
#[derive(Clone)]
pub struct Sessions {
    cache: Option<Arc<dyn SessionCache>>,
}

impl Sessions {
    pub fn new(cache: Option<Arc<dyn SessionCache>>) -> Self {
        Self { cache }
    }

    /// Build from a cache URL: `memory://` (or empty) for the in-process
    /// cache, `none`/`disabled` to run without sessions. Unsupported
    /// backends fall back to the in-process cache.
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        match url {
            "none" | "disabled" | "off" => {
                tracing::warn!("Session cache disabled, authenticated requests will be rejected");
                Self::new(None)
            }
            "" | "memory" | "memory://" => Self::new(Some(Arc::new(MemorySessionCache::new()))),
            other => {
                tracing::warn!(
                    "Session cache backend {} is not supported, using the in-memory cache",
                    other.split("://").next().unwrap_or(other)
                );
                Self::new(Some(Arc::new(MemorySessionCache::new())))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.cache.as_ref().map(|c| c.name()).unwrap_or("disabled")
    }

    /// Mint a token for `user` and store the session. The token is
    /// returned even when no cache is configured.
    pub async fn create(&self, user: &SessionUser) -> Result<String, Error> {
        let token = mint_token();
        if let Some(cache) = &self.cache {
            let value = serde_json::to_string(user)?;
            cache.set(&session_key(&token), value, SESSION_TTL).await?;
        }
        Ok(token)
    }

    pub async fn lookup(&self, token: &str) -> Result<Option<SessionUser>, Error> {
        let Some(cache) = &self.cache else {
            return Ok(None);
        };
        match cache.get(&session_key(token)).await? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    pub async fn revoke(&self, token: &str) -> Result<bool, Error> {
        match &self.cache {
            Some(cache) => cache.delete(&session_key(token)).await,
            None => Ok(false),
        }
    }
}

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use tokio::time::Instant;

use super::SessionCache;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process session cache. Entries expire passively: reads ignore
/// expired entries and writes prune them.
#[derive(Default)]
pub struct MemorySessionCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), Error> {
        let now = Instant::now();
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Session cache lock poisoned"))?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Session cache lock poisoned"))?;
        let value = entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone());
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<bool, Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Session cache lock poisoned"))?;
        let removed = entries.remove(key);
        Ok(removed.is_some_and(|entry| entry.expires_at > Instant::now()))
    }
}

//! Read-through cache for resolved claimable balances. Entries are plain
//! timestamped values keyed by lowercased wallet address; reads and writes
//! are idempotent replacements, so no locking is involved.

use std::collections::HashMap;
use std::time::Duration;

use cosmwasm_std::Addr;
use ember_types::claims::TokensResponse;

struct CachedTokens {
    inserted_at: u64,
    payload: TokensResponse,
}

pub struct TokensCache {
    ttl: Duration,
    entries: HashMap<String, CachedTokens>,
}

impl TokensCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn key(wallet: &Addr) -> String {
        wallet.as_str().to_lowercase()
    }

    /// A fresh entry is returned as-is, so repeated reads within the TTL are
    /// byte-identical.
    pub fn get(&self, key: &str, now: u64) -> Option<TokensResponse> {
        let entry = self.entries.get(key)?;
        if now.saturating_sub(entry.inserted_at) < self.ttl.as_secs() {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: &str, payload: TokensResponse, now: u64) {
        self.entries.insert(
            key.to_string(),
            CachedTokens {
                inserted_at: now,
                payload,
            },
        );
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

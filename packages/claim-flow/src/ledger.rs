//! Client-local claim history. The persistence boundary is a single named
//! key holding a JSON array of entries: read once at load, rewritten in full
//! on every append. Entries are append-only and never mutated or removed.

use ember_types::claims::LedgerEntry;

pub const LEDGER_KEY: &str = "ember_claim_history";

/// The host's string storage (browser local storage or equivalent).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

#[derive(Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

pub struct Ledger<S: KeyValueStore> {
    store: S,
    key: String,
    entries: Vec<LedgerEntry>,
}

impl<S: KeyValueStore> Ledger<S> {
    /// A missing or malformed stored value degrades to an empty ledger.
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = store
            .get(&key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            store,
            key,
            entries,
        }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn append(&mut self, entry: LedgerEntry) -> Result<(), serde_json::Error> {
        self.entries.push(entry);
        let raw = serde_json::to_string(&self.entries)?;
        self.store.set(&self.key, raw);
        Ok(())
    }
}

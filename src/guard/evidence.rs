//! Client-held session evidence and its storage backends.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Storage key for the opaque session identifier.
pub const SESSION_ID_KEY: &str = "sessionId";
/// Storage key for the serialized user projection.
pub const USER_KEY: &str = "authUser";

/// Minimal user projection held alongside the session id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub username: String,
}

/// Client-held proof of a previously valid session.
///
/// Presence implies the session was valid when stored; the guard trusts it
/// for rendering decisions without re-checking expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    pub session_id: String,
    pub user: StoredUser,
}

/// A string key/value store with web-storage semantics.
pub trait EvidenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store; stands in for `localStorage`/`sessionStorage` in tests
/// and native frontends.
#[derive(Debug, Default)]
pub struct MemoryEvidenceStore {
    entries: Mutex<HashMap<String, String>>,
}

impl EvidenceStore for MemoryEvidenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Durable/volatile evidence pair.
///
/// The backend is chosen by a single boolean at write time; nothing else in
/// the guard branches on where evidence lives. Readers check durable first.
pub struct SessionEvidence {
    durable: Arc<dyn EvidenceStore>,
    volatile: Arc<dyn EvidenceStore>,
}

impl SessionEvidence {
    #[must_use]
    pub fn new(durable: Arc<dyn EvidenceStore>, volatile: Arc<dyn EvidenceStore>) -> Self {
        Self { durable, volatile }
    }

    /// Both backends in memory; the usual setup for tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryEvidenceStore::default()),
            Arc::new(MemoryEvidenceStore::default()),
        )
    }

    pub fn store(&self, evidence: &Evidence, durable: bool) {
        let target = if durable { &self.durable } else { &self.volatile };
        target.set(SESSION_ID_KEY, &evidence.session_id);
        if let Ok(user) = serde_json::to_string(&evidence.user) {
            target.set(USER_KEY, &user);
        }
    }

    #[must_use]
    pub fn load(&self) -> Option<Evidence> {
        Self::read(self.durable.as_ref()).or_else(|| Self::read(self.volatile.as_ref()))
    }

    fn read(store: &dyn EvidenceStore) -> Option<Evidence> {
        let session_id = store.get(SESSION_ID_KEY)?;
        let user = serde_json::from_str(&store.get(USER_KEY)?).ok()?;
        Some(Evidence { session_id, user })
    }

    /// Remove evidence from both backends.
    pub fn clear(&self) {
        for store in [&self.durable, &self.volatile] {
            store.remove(SESSION_ID_KEY);
            store.remove(USER_KEY);
        }
    }
}

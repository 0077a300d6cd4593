use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::session::Session;
use crate::storage::{KeyValueStorage, StorageError};

/// Key holding the analyzer wizard blob.
pub const SESSION_KEY: &str = "gapAnalyzerState";

/// Persistence seam for the analyzer session.
///
/// `load` never fails: absent or corrupt state yields `Session::default()`.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Session;
    fn save(&self, session: &Session) -> Result<(), StorageError>;
    fn reset(&self) -> Result<(), StorageError>;
}

/// `SessionStore` over any `KeyValueStorage`, as one JSON blob under [`SESSION_KEY`].
#[derive(Clone)]
pub struct StoredSession {
    storage: Arc<dyn KeyValueStorage>,
}

impl StoredSession {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }
}

impl SessionStore for StoredSession {
    fn load(&self) -> Session {
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Session::default(),
            Err(e) => {
                warn!("Failed to read saved analyzer state: {e}");
                return Session::default();
            }
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => Session::restore(&value),
            Err(e) => {
                warn!("Failed to restore saved analyzer state: {e}");
                Session::default()
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        let blob = serde_json::to_string(session)?;
        self.storage.set(SESSION_KEY, &blob)?;
        debug!("Persisted analyzer state ({} bytes)", blob.len());
        Ok(())
    }

    fn reset(&self) -> Result<(), StorageError> {
        self.storage.remove(SESSION_KEY)
    }
}

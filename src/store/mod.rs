//! History persistence.
//!
//! This module is part of the imperative shell: it loads and saves the
//! calculation history through a key-value storage backend. The pure
//! transition function never touches it; the engine runs these effects
//! before and after transitions.
//!
//! # Example
//!
//! ```rust
//! use reckon::store::{load_history, save_history, MemoryStore, StoreEnv};
//! use stillwater::effect::Effect;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let env = StoreEnv::new(Arc::new(MemoryStore::new()));
//!
//! save_history(Vec::new()).run(&env).await.unwrap();
//! let entries = load_history().run(&env).await.unwrap();
//! assert!(entries.is_empty());
//! # });
//! ```

mod effects;
pub mod error;
mod file;
mod memory;
mod validation;

pub use effects::{load_history, run_blocking, save_history};
pub use error::{RecordViolation, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use validation::validate_records;

use std::fmt;
use std::sync::Arc;

/// Storage key the history list lives under unless configured otherwise.
pub const HISTORY_STORAGE_KEY: &str = "calculator_history";

/// Durable string key-value storage.
///
/// Implementations provide the actual backend. Values are opaque strings;
/// the history effects store a JSON array under a single key.
pub trait KeyValueStore: Send + Sync {
    /// Get the value for a key, returning `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value (overwrite semantics).
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Environment the history effects run in: a backend plus the key to use.
#[derive(Clone)]
pub struct StoreEnv {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl StoreEnv {
    /// Environment over `store` using [`HISTORY_STORAGE_KEY`].
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: HISTORY_STORAGE_KEY.to_string(),
        }
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for StoreEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreEnv").field("key", &self.key).finish()
    }
}

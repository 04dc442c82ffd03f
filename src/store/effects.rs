//! Effects that load and persist calculation history.
//!
//! Both effects run against a [`StoreEnv`]. Saving always writes the complete
//! list, so racing saves are harmless: whichever lands last wins.
//!
//! Backends are synchronous. From async code, run these effects through
//! [`run_blocking`] so file I/O never occupies a runtime worker.

use crate::core::HistoryEntry;
use crate::store::validation::validate_records;
use crate::store::{StoreEnv, StoreError};
use log::debug;
use stillwater::effect::Effect;
use stillwater::prelude::*;
use stillwater::validation::Validation;
use tokio::runtime::Handle;

/// Load the persisted history, newest first.
///
/// A missing key yields an empty history. Records that parse but fail
/// validation are all reported in one [`StoreError::InvalidRecords`].
pub fn load_history() -> impl Effect<Output = Vec<HistoryEntry>, Error = StoreError, Env = StoreEnv>
{
    from_fn(|env: &StoreEnv| -> Result<Vec<HistoryEntry>, StoreError> {
        let Some(raw) = env.store().get(env.key())? else {
            debug!("No stored history under '{}'", env.key());
            return Ok(Vec::new());
        };

        let entries: Vec<HistoryEntry> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;

        match validate_records(&entries) {
            Validation::Success(_) => Ok(entries),
            Validation::Failure(violations) => Err(StoreError::InvalidRecords(violations)),
        }
    })
}

/// Overwrite the persisted history with `entries`.
pub fn save_history(
    entries: Vec<HistoryEntry>,
) -> impl Effect<Output = (), Error = StoreError, Env = StoreEnv> {
    from_fn(move |env: &StoreEnv| -> Result<(), StoreError> {
        let json = serde_json::to_string(&entries)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        env.store().set(env.key(), &json)
    })
}

/// Run a store effect on the runtime's blocking thread pool.
pub async fn run_blocking<E, T>(effect: E, env: StoreEnv) -> Result<T, StoreError>
where
    E: Effect<Output = T, Error = StoreError, Env = StoreEnv> + Send + 'static,
    T: Send + 'static,
{
    let runtime = Handle::current();
    tokio::task::spawn_blocking(move || runtime.block_on(effect.run(&env)))
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Operator, Stamp};
    use crate::store::{
        FileStore, KeyValueStore, MemoryStore, RecordViolation, HISTORY_STORAGE_KEY,
    };
    use std::sync::Arc;
    use uuid::Uuid;

    fn sample(count: usize) -> Vec<HistoryEntry> {
        (0..count)
            .map(|n| {
                let operand = n as f64;
                HistoryEntry::from_calculation(
                    Stamp::now(),
                    operand,
                    Operator::Multiply,
                    2.0,
                    operand * 2.0,
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn load_from_empty_store_is_empty() {
        let env = StoreEnv::new(Arc::new(MemoryStore::new()));
        let entries = load_history().run(&env).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_preserves_entries() {
        let env = StoreEnv::new(Arc::new(MemoryStore::new()));
        let entries = sample(3);

        save_history(entries.clone()).run(&env).await.unwrap();
        let loaded = load_history().run(&env).await.unwrap();

        assert_eq!(loaded, entries);
    }

    #[tokio::test]
    async fn save_overwrites_previous_list() {
        let env = StoreEnv::new(Arc::new(MemoryStore::new()));

        save_history(sample(5)).run(&env).await.unwrap();
        save_history(sample(2)).run(&env).await.unwrap();

        let loaded = load_history().run(&env).await.unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[tokio::test]
    async fn persisted_format_is_json_array_with_iso_timestamps() {
        let store = Arc::new(MemoryStore::new());
        let env = StoreEnv::new(store.clone());
        let entries = sample(1);

        save_history(entries.clone()).run(&env).await.unwrap();

        let raw = store.get(HISTORY_STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let record = &json[0];
        assert_eq!(record["id"], entries[0].id.as_str());
        assert_eq!(record["expression"], "0 * 2");
        assert_eq!(record["result"], 0.0);

        let timestamp = record["timestamp"].as_str().unwrap();
        let parsed = chrono::DateTime::parse_from_rfc3339(timestamp).unwrap();
        assert_eq!(parsed, entries[0].timestamp);
    }

    #[tokio::test]
    async fn loads_records_written_by_other_clients() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                HISTORY_STORAGE_KEY,
                r#"[{"id":"1700000000000","expression":"5 + 3","result":8,"timestamp":"2024-01-15T10:30:00.000Z"}]"#,
            )
            .unwrap();

        let env = StoreEnv::new(store);
        let loaded = load_history().run(&env).await.unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].expression, "5 + 3");
        assert_eq!(loaded[0].result, 8.0);
        assert_eq!(loaded[0].timestamp.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[tokio::test]
    async fn malformed_json_is_deserialization_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_STORAGE_KEY, "{not json").unwrap();

        let env = StoreEnv::new(store);
        let result = load_history().run(&env).await;
        assert!(matches!(result, Err(StoreError::DeserializationFailed(_))));
    }

    #[tokio::test]
    async fn invalid_records_are_all_reported() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                HISTORY_STORAGE_KEY,
                r#"[
                    {"id":"","expression":"1 + 1","result":2,"timestamp":"2024-01-15T10:30:00Z"},
                    {"id":"b","expression":"","result":2,"timestamp":"2024-01-15T10:30:00Z"}
                ]"#,
            )
            .unwrap();

        let env = StoreEnv::new(store);
        match load_history().run(&env).await {
            Err(StoreError::InvalidRecords(violations)) => {
                assert_eq!(violations.len(), 2);
                assert!(violations
                    .iter()
                    .any(|v| *v == RecordViolation::MissingId { index: 0 }));
                assert!(violations
                    .iter()
                    .any(|v| *v == RecordViolation::MissingExpression { index: 1 }));
            }
            other => panic!("Expected InvalidRecords, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn custom_key_is_isolated() {
        let store = Arc::new(MemoryStore::new());
        let default_env = StoreEnv::new(store.clone());
        let other_env = StoreEnv::new(store).with_key("scratch_history");

        save_history(sample(2)).run(&other_env).await.unwrap();

        assert!(load_history().run(&default_env).await.unwrap().is_empty());
        assert_eq!(load_history().run(&other_env).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("reckon-effects-{}", Uuid::new_v4()));
        let env = StoreEnv::new(Arc::new(FileStore::new(&dir)));
        let entries = sample(4);

        save_history(entries.clone()).run(&env).await.unwrap();
        let loaded = load_history().run(&env).await.unwrap();
        assert_eq!(loaded, entries);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test(flavor = "current_thread")]
    async fn run_blocking_round_trips_on_current_thread_runtime() {
        let env = StoreEnv::new(Arc::new(MemoryStore::new()));
        let entries = sample(2);

        run_blocking(save_history(entries.clone()), env.clone())
            .await
            .unwrap();
        let loaded = run_blocking(load_history(), env).await.unwrap();

        assert_eq!(loaded, entries);
    }
}

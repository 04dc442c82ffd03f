//! End-to-end tests: engine, file-backed store and configuration together.

use reckon::core::Operator;
use reckon::store::{FileStore, KeyValueStore};
use reckon::{Calculator, EngineConfig};
use std::path::PathBuf;
use uuid::Uuid;

fn temp_config() -> EngineConfig {
    EngineConfig {
        data_dir: Some(std::env::temp_dir().join(format!("reckon-it-{}", Uuid::new_v4()))),
        ..EngineConfig::default()
    }
}

fn cleanup(dir: PathBuf) {
    if dir.exists() {
        std::fs::remove_dir_all(dir).unwrap();
    }
}

#[tokio::test]
async fn history_round_trips_through_files() {
    let config = temp_config();

    let calculator = Calculator::start(config.open_store()).await;
    calculator.input_number("1");
    calculator.input_number("2");
    calculator.input_operation(Operator::Divide);
    calculator.input_number("4");
    calculator.calculate();
    calculator.flush().await.unwrap();
    assert_eq!(calculator.display(), "3");

    let restarted = Calculator::start(config.open_store()).await;
    let history = restarted.state().history;
    assert_eq!(history.len(), 1);
    assert_eq!(history.latest().unwrap().expression, "12 / 4");
    assert_eq!(history.latest().unwrap().result, 3.0);

    cleanup(config.resolved_data_dir());
}

#[tokio::test]
async fn corrupt_history_file_starts_empty() {
    let config = temp_config();
    let dir = config.resolved_data_dir();
    FileStore::new(&dir)
        .set(&config.storage_key, "not json at all")
        .unwrap();

    let calculator = Calculator::start(config.open_store()).await;
    assert!(calculator.state().history.is_empty());
    assert!(calculator.hydrate().await.is_err());

    // The next calculation overwrites the corrupt file with a valid list
    calculator.input_number("2");
    calculator.input_operation(Operator::Subtract);
    calculator.input_number("5");
    calculator.calculate();
    calculator.flush().await.unwrap();

    let restarted = Calculator::start(config.open_store()).await;
    assert_eq!(restarted.state().history.latest().unwrap().result, -3.0);

    cleanup(dir);
}

#[tokio::test]
async fn cleared_history_stays_cleared() {
    let config = temp_config();

    let calculator = Calculator::start(config.open_store()).await;
    calculator.input_number("9");
    calculator.input_operation(Operator::Modulo);
    calculator.input_number("4");
    calculator.calculate();
    calculator.clear_history();
    calculator.flush().await.unwrap();

    let restarted = Calculator::start(config.open_store()).await;
    assert!(restarted.state().history.is_empty());

    cleanup(config.resolved_data_dir());
}

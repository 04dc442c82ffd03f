//! The calculator service: single owner of the state.

use crate::core::{reduce, Action, CalculatorState, HistoryEntry, Operator, Stamp};
use crate::store::{load_history, run_blocking, save_history, StoreEnv, StoreError};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Bookkeeping for detached history saves.
///
/// Every history change gets a generation number while the state lock is
/// held, so generations follow transition order. A save whose generation is
/// not newer than the last one written is skipped, which keeps the stored
/// list equal to the newest history even when tasks finish out of order.
#[derive(Default)]
struct SaveLedger {
    issued: AtomicU64,
    written: Arc<tokio::sync::Mutex<u64>>,
    in_flight: Mutex<Vec<JoinHandle<Result<(), StoreError>>>>,
}

/// Calculator engine shared by every view component.
///
/// Owns the one [`CalculatorState`] and is the only way to change it. State
/// updates are synchronous; persisting history is a detached task on the
/// runtime captured at construction.
///
/// # Example
///
/// ```rust
/// use reckon::engine::Calculator;
/// use reckon::core::Operator;
/// use reckon::store::{MemoryStore, StoreEnv};
/// use std::sync::Arc;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let calculator = Calculator::start(StoreEnv::new(Arc::new(MemoryStore::new()))).await;
///
/// calculator.input_number("2");
/// calculator.input_operation(Operator::Add);
/// calculator.input_number("3");
/// calculator.calculate();
///
/// assert_eq!(calculator.display(), "5");
/// calculator.flush().await.unwrap();
/// # });
/// ```
pub struct Calculator {
    state: watch::Sender<CalculatorState>,
    env: StoreEnv,
    runtime: Handle,
    saves: SaveLedger,
}

impl Calculator {
    /// Create an engine in the initial state without loading history.
    pub fn new(env: StoreEnv, runtime: Handle) -> Self {
        let (state, _) = watch::channel(CalculatorState::initial());
        Self {
            state,
            env,
            runtime,
            saves: SaveLedger::default(),
        }
    }

    /// Create an engine on the current runtime and hydrate its history.
    ///
    /// A history that cannot be loaded is logged and left empty.
    pub async fn start(env: StoreEnv) -> Self {
        let calculator = Self::new(env, Handle::current());
        if let Err(err) = calculator.hydrate().await {
            warn!("Starting with empty history: {err}");
        }
        calculator
    }

    /// Load persisted history and replace the in-memory list with it.
    ///
    /// Call this before dispatching. If history was already saved, the loaded
    /// list is written back so storage matches memory again.
    pub async fn hydrate(&self) -> Result<(), StoreError> {
        let entries = run_blocking(load_history(), self.env.clone()).await?;
        info!(
            "Loaded {} history entries from '{}'",
            entries.len(),
            self.env.key()
        );
        let saved_before = self.saves.issued.load(Ordering::SeqCst) > 0;
        self.transition(Action::SetHistory(entries), saved_before);
        Ok(())
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CalculatorState {
        self.state.borrow().clone()
    }

    pub fn display(&self) -> String {
        self.state.borrow().display.clone()
    }

    /// Receiver notified after every transition that changes the state.
    pub fn subscribe(&self) -> watch::Receiver<CalculatorState> {
        self.state.subscribe()
    }

    /// Apply an action, then persist history if it changed.
    pub fn dispatch(&self, action: Action) {
        self.transition(action, true);
    }

    pub fn input_number(&self, digit: &str) {
        self.dispatch(Action::InputDigit(digit.to_string()));
    }

    pub fn input_operation(&self, operator: Operator) {
        self.dispatch(Action::InputOperation(operator));
    }

    /// Complete the pending operation (the `=` key).
    pub fn calculate(&self) {
        self.dispatch(Action::Calculate(Stamp::now()));
    }

    pub fn clear(&self) {
        self.dispatch(Action::Clear);
    }

    pub fn clear_entry(&self) {
        self.dispatch(Action::ClearEntry);
    }

    pub fn backspace(&self) {
        self.dispatch(Action::Backspace);
    }

    pub fn toggle_sign(&self) {
        self.dispatch(Action::ToggleSign);
    }

    pub fn percent(&self) {
        self.dispatch(Action::Percent);
    }

    pub fn square_root(&self) {
        self.dispatch(Action::SquareRoot);
    }

    pub fn memory_clear(&self) {
        self.dispatch(Action::MemoryClear);
    }

    pub fn memory_recall(&self) {
        self.dispatch(Action::MemoryRecall);
    }

    pub fn memory_add(&self) {
        self.dispatch(Action::MemoryAdd);
    }

    pub fn memory_subtract(&self) {
        self.dispatch(Action::MemorySubtract);
    }

    pub fn clear_history(&self) {
        self.dispatch(Action::ClearHistory);
    }

    /// Wait for every in-flight save, returning the first failure.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let handles = std::mem::take(&mut *self.in_flight());

        let mut first_error = None;
        for handle in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(StoreError::Backend(join_err.to_string())),
            };
            if let Err(err) = outcome {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn transition(&self, action: Action, persist: bool) {
        let name = action.name();
        let mut pending_save = None;

        self.state.send_if_modified(|state| {
            let next = reduce(state, action);
            if persist && next.history != state.history {
                let generation = self.saves.issued.fetch_add(1, Ordering::SeqCst) + 1;
                pending_save = Some((generation, next.history.entries().to_vec()));
            }
            let changed = next != *state;
            *state = next;
            changed
        });

        debug!("{name} -> display '{}'", self.state.borrow().display);

        if let Some((generation, entries)) = pending_save {
            self.spawn_save(generation, entries);
        }
    }

    fn spawn_save(&self, generation: u64, entries: Vec<HistoryEntry>) {
        let env = self.env.clone();
        let written = Arc::clone(&self.saves.written);

        let handle = self.runtime.spawn(async move {
            let mut last_written = written.lock().await;
            if generation <= *last_written {
                debug!("Skipping stale history save #{generation}");
                return Ok(());
            }

            let count = entries.len();
            match run_blocking(save_history(entries), env).await {
                Ok(()) => {
                    *last_written = generation;
                    debug!("Saved {count} history entries (#{generation})");
                    Ok(())
                }
                Err(err) => {
                    warn!("Failed to save history (#{generation}): {err}");
                    Err(err)
                }
            }
        });

        let mut in_flight = self.in_flight();
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
    }

    fn in_flight(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<Result<(), StoreError>>>> {
        self.saves
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

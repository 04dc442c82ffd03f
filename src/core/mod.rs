//! Core calculator types and logic.
//!
//! This module contains the pure functional core of the engine:
//! - State and the closed set of actions
//! - The transition function
//! - Number formatting
//! - Immutable, capped calculation history
//!
//! All logic in this module is pure (no side effects), following
//! the "pure core, imperative shell" philosophy.

mod action;
mod error;
mod format;
mod history;
mod state;
mod transition;

pub use action::{Action, Operator, Stamp};
pub use error::CalcError;
pub use format::{format_number, parse_display, DISPLAY_PRECISION};
pub use history::{History, HistoryEntry, MAX_HISTORY_ENTRIES};
pub use state::{CalculatorState, ErrorState, PendingOperation, ERROR_DISPLAY};
pub use transition::reduce;

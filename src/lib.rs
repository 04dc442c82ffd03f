//! Reckon: a pure functional calculator engine
//!
//! Reckon is built on the "pure core, imperative shell" philosophy.
//! The calculator logic is a pure transition function with no side effects,
//! while history persistence is isolated in Stillwater effects run by the
//! engine after each transition.
//!
//! # Core Concepts
//!
//! - **State**: `CalculatorState`, replaced on every action, never mutated by callers
//! - **Actions**: a closed `Action` enum covering every key and internal event
//! - **Transition**: `reduce(&state, action) -> state`, strictly left-to-right evaluation
//! - **History**: immutable, newest-first, capped at 50 entries and persisted as JSON
//!
//! # Example
//!
//! ```rust
//! use reckon::core::{reduce, Action, CalculatorState, Operator, Stamp};
//!
//! let state = CalculatorState::initial();
//! let state = reduce(&state, Action::InputDigit("5".to_string()));
//! let state = reduce(&state, Action::InputOperation(Operator::Divide));
//! let state = reduce(&state, Action::InputDigit("0".to_string()));
//! let state = reduce(&state, Action::Calculate(Stamp::now()));
//!
//! assert!(state.has_error());
//! assert_eq!(state.display, "Error");
//!
//! let state = reduce(&state, Action::InputDigit("7".to_string()));
//! assert!(!state.has_error());
//! assert_eq!(state.display, "7");
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod store;

// Re-export commonly used types
pub use config::EngineConfig;
pub use self::core::{reduce, Action, CalcError, CalculatorState, HistoryEntry, Operator};
pub use engine::Calculator;

//! Calculator state.
//!
//! The state is a plain value: the transition function reads one and returns
//! a new one. Callers only ever observe it.

use super::action::Operator;
use super::error::CalcError;
use super::history::History;
use serde::{Deserialize, Serialize};

/// Text shown while an error is active.
pub const ERROR_DISPLAY: &str = "Error";

/// An operator waiting for its right-hand operand.
///
/// Bundling the operand with the operator keeps "previous value is set iff
/// an operation is set" true by construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Operand captured before the operator was pressed
    pub operand: f64,
    pub operator: Operator,
}

/// An active arithmetic error.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorState {
    pub kind: CalcError,
    /// Last valid value on the display when the error was raised
    pub operand: f64,
}

/// Complete calculator state.
///
/// # Example
///
/// ```rust
/// use reckon::core::CalculatorState;
///
/// let state = CalculatorState::initial();
/// assert_eq!(state.display, "0");
/// assert_eq!(state.memory, 0.0);
/// assert!(!state.has_error());
/// assert!(state.previous_value().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculatorState {
    /// Current display text, a decimal numeral unless an error is active
    pub display: String,
    pub pending: Option<PendingOperation>,
    /// The next digit starts a fresh number instead of appending
    pub waiting_for_operand: bool,
    pub memory: f64,
    pub history: History,
    pub error: Option<ErrorState>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::initial()
    }
}

impl CalculatorState {
    /// State at engine startup: display `"0"`, empty memory and history.
    pub fn initial() -> Self {
        Self {
            display: "0".to_string(),
            pending: None,
            waiting_for_operand: false,
            memory: 0.0,
            history: History::new(),
            error: None,
        }
    }

    /// Operand captured before the pending operator.
    pub fn previous_value(&self) -> Option<f64> {
        self.pending.map(|p| p.operand)
    }

    /// The pending operator.
    pub fn operation(&self) -> Option<Operator> {
        self.pending.map(|p| p.operator)
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// User-facing message of the active error.
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.kind.to_string())
    }
}

//! The closed set of events the calculator accepts.

use super::error::CalcError;
use super::history::HistoryEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Binary operators the calculator can hold pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl Operator {
    /// Symbol used on keys and in history expressions.
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Modulo => '%',
        }
    }

    /// Look up an operator by its key symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            '%' => Some(Self::Modulo),
            _ => None,
        }
    }

    /// Apply the operator to two operands (pure).
    ///
    /// A zero right-hand side for `Divide` or `Modulo` is a
    /// [`CalcError::DivisionByZero`]; a non-finite result is a
    /// [`CalcError::Overflow`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use reckon::core::{CalcError, Operator};
    ///
    /// assert_eq!(Operator::Multiply.apply(6.0, 7.0), Ok(42.0));
    /// assert_eq!(Operator::Divide.apply(5.0, 0.0), Err(CalcError::DivisionByZero));
    /// ```
    pub fn apply(&self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        let result = match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide | Self::Modulo if rhs == 0.0 => {
                return Err(CalcError::DivisionByZero);
            }
            Self::Divide => lhs / rhs,
            Self::Modulo => lhs % rhs,
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(CalcError::Overflow)
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Identity and time assigned to a completed calculation.
///
/// The shell creates the stamp so the reducer never reads the clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    pub id: String,
    pub at: DateTime<Utc>,
}

impl Stamp {
    /// Fresh stamp with a random id and the current time.
    pub fn now() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            at: Utc::now(),
        }
    }
}

/// Events accepted by the transition function.
///
/// Actions are immutable values; [`crate::core::reduce`] consumes them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// A digit key (`"0"`..`"9"`) or the decimal point (`"."`)
    InputDigit(String),
    InputOperation(Operator),
    /// The `=` key
    Calculate(Stamp),
    Clear,
    ClearEntry,
    Backspace,
    ToggleSign,
    Percent,
    SquareRoot,
    MemoryClear,
    MemoryRecall,
    MemoryAdd,
    MemorySubtract,
    ClearHistory,
    /// Replace the whole history, used when hydrating from storage
    SetHistory(Vec<HistoryEntry>),
    AddHistory(HistoryEntry),
    SetError(CalcError),
    ClearError,
}

impl Action {
    /// Stable label for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InputDigit(_) => "InputDigit",
            Self::InputOperation(_) => "InputOperation",
            Self::Calculate(_) => "Calculate",
            Self::Clear => "Clear",
            Self::ClearEntry => "ClearEntry",
            Self::Backspace => "Backspace",
            Self::ToggleSign => "ToggleSign",
            Self::Percent => "Percent",
            Self::SquareRoot => "SquareRoot",
            Self::MemoryClear => "MemoryClear",
            Self::MemoryRecall => "MemoryRecall",
            Self::MemoryAdd => "MemoryAdd",
            Self::MemorySubtract => "MemorySubtract",
            Self::ClearHistory => "ClearHistory",
            Self::SetHistory(_) => "SetHistory",
            Self::AddHistory(_) => "AddHistory",
            Self::SetError(_) => "SetError",
            Self::ClearError => "ClearError",
        }
    }
}

//! Arithmetic errors raised by the transition function.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors an arithmetic step can raise.
///
/// These never escape as panics or `Err` values from the reducer. Raising one
/// is a state transition: the machine records it and shows `"Error"` until the
/// user recovers.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalcError {
    /// Division (or modulo) with a zero right-hand operand
    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// Square root of a negative operand
    #[error("Cannot calculate square root of negative number")]
    NegativeSquareRoot,

    /// Arithmetic produced an infinite or NaN value
    #[error("Result is too large to display")]
    Overflow,
}

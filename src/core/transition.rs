//! The transition function.
//!
//! [`reduce`] maps a state and an action to the next state. It is pure: no
//! clock, no randomness, no I/O. Identity and time for history entries arrive
//! inside [`Action::Calculate`].

use super::action::{Action, Operator, Stamp};
use super::error::CalcError;
use super::format::{format_number, parse_display};
use super::history::{History, HistoryEntry};
use super::state::{CalculatorState, ErrorState, PendingOperation, ERROR_DISPLAY};

/// Apply one action to a state, returning the next state.
///
/// Evaluation is strictly left-to-right: entering an operator while a full
/// second operand is on the display applies the pending operator first.
///
/// # Example
///
/// ```rust
/// use reckon::core::{reduce, Action, CalculatorState, Operator, Stamp};
///
/// let actions = [
///     Action::InputDigit("2".to_string()),
///     Action::InputOperation(Operator::Add),
///     Action::InputDigit("3".to_string()),
///     Action::InputOperation(Operator::Multiply),
///     Action::InputDigit("4".to_string()),
///     Action::Calculate(Stamp::now()),
/// ];
///
/// let state = actions
///     .into_iter()
///     .fold(CalculatorState::initial(), |state, action| reduce(&state, action));
///
/// assert_eq!(state.display, "20");
/// assert_eq!(state.history.len(), 1);
/// ```
pub fn reduce(state: &CalculatorState, action: Action) -> CalculatorState {
    match action {
        Action::InputDigit(digit) => input_digit(state, &digit),
        Action::InputOperation(operator) => input_operation(state, operator),
        Action::Calculate(stamp) => calculate(state, stamp),
        Action::Clear => CalculatorState {
            memory: state.memory,
            history: state.history.clone(),
            ..CalculatorState::initial()
        },
        Action::ClearEntry => CalculatorState {
            display: "0".to_string(),
            error: None,
            ..state.clone()
        },
        Action::Backspace => backspace(state),
        Action::ToggleSign => unless_error(state, |s| CalculatorState {
            display: format_number(-current(s)),
            ..s.clone()
        }),
        Action::Percent => unless_error(state, |s| CalculatorState {
            display: format_number(current(s) / 100.0),
            ..s.clone()
        }),
        Action::SquareRoot => unless_error(state, square_root),
        Action::MemoryClear => unless_error(state, |s| CalculatorState {
            memory: 0.0,
            ..s.clone()
        }),
        Action::MemoryRecall => unless_error(state, |s| CalculatorState {
            display: format_number(s.memory),
            waiting_for_operand: true,
            ..s.clone()
        }),
        Action::MemoryAdd => unless_error(state, |s| accumulate(s, Operator::Add)),
        Action::MemorySubtract => unless_error(state, |s| accumulate(s, Operator::Subtract)),
        Action::ClearHistory => CalculatorState {
            history: History::new(),
            ..state.clone()
        },
        Action::SetHistory(entries) => CalculatorState {
            history: History::replace(entries),
            ..state.clone()
        },
        Action::AddHistory(entry) => CalculatorState {
            history: state.history.record(entry),
            ..state.clone()
        },
        Action::SetError(kind) => raise(state, kind),
        Action::ClearError => match state.error {
            Some(error) => CalculatorState {
                display: format_number(error.operand),
                error: None,
                ..state.clone()
            },
            None => state.clone(),
        },
    }
}

/// Value currently on the display.
fn current(state: &CalculatorState) -> f64 {
    parse_display(&state.display)
}

fn unless_error<F>(state: &CalculatorState, transition: F) -> CalculatorState
where
    F: FnOnce(&CalculatorState) -> CalculatorState,
{
    if state.has_error() {
        state.clone()
    } else {
        transition(state)
    }
}

/// Enter the error state. Pending operation, memory and history survive.
fn raise(state: &CalculatorState, kind: CalcError) -> CalculatorState {
    let operand = state
        .error
        .map(|e| e.operand)
        .unwrap_or_else(|| current(state));

    CalculatorState {
        display: ERROR_DISPLAY.to_string(),
        error: Some(ErrorState { kind, operand }),
        ..state.clone()
    }
}

fn is_digit_key(key: &str) -> bool {
    key == "." || (key.len() == 1 && key.bytes().all(|b| b.is_ascii_digit()))
}

fn start_number(key: &str) -> String {
    if key == "." {
        "0.".to_string()
    } else {
        key.to_string()
    }
}

fn input_digit(state: &CalculatorState, key: &str) -> CalculatorState {
    if !is_digit_key(key) {
        return state.clone();
    }

    if state.has_error() {
        return CalculatorState {
            display: start_number(key),
            memory: state.memory,
            history: state.history.clone(),
            ..CalculatorState::initial()
        };
    }

    if state.waiting_for_operand {
        return CalculatorState {
            display: start_number(key),
            waiting_for_operand: false,
            ..state.clone()
        };
    }

    let display = if key == "." {
        if state.display.contains('.') {
            return state.clone();
        }
        format!("{}.", state.display)
    } else if state.display == "0" {
        key.to_string()
    } else {
        format!("{}{}", state.display, key)
    };

    // Past f64 range the display would no longer read back as a number.
    if !display.parse::<f64>().is_ok_and(f64::is_finite) {
        return state.clone();
    }

    CalculatorState {
        display,
        ..state.clone()
    }
}

fn input_operation(state: &CalculatorState, operator: Operator) -> CalculatorState {
    if let Some(error) = state.error {
        return CalculatorState {
            display: format_number(error.operand),
            pending: Some(PendingOperation {
                operand: error.operand,
                operator,
            }),
            waiting_for_operand: true,
            error: None,
            ..state.clone()
        };
    }

    let value = current(state);

    match state.pending {
        None => CalculatorState {
            pending: Some(PendingOperation {
                operand: value,
                operator,
            }),
            waiting_for_operand: true,
            ..state.clone()
        },
        // A complete second operand is on the display: chain.
        Some(pending) if !state.waiting_for_operand => {
            match pending.operator.apply(pending.operand, value) {
                Ok(result) => CalculatorState {
                    display: format_number(result),
                    pending: Some(PendingOperation {
                        operand: result,
                        operator,
                    }),
                    waiting_for_operand: true,
                    ..state.clone()
                },
                Err(kind) => raise(state, kind),
            }
        }
        // Two operators in a row: the later one wins.
        Some(pending) => CalculatorState {
            pending: Some(PendingOperation {
                operator,
                ..pending
            }),
            ..state.clone()
        },
    }
}

fn calculate(state: &CalculatorState, stamp: Stamp) -> CalculatorState {
    if state.has_error() || state.waiting_for_operand {
        return state.clone();
    }
    let Some(pending) = state.pending else {
        return state.clone();
    };

    let value = current(state);
    match pending.operator.apply(pending.operand, value) {
        Ok(result) => {
            let entry = HistoryEntry::from_calculation(
                stamp,
                pending.operand,
                pending.operator,
                value,
                result,
            );
            CalculatorState {
                display: format_number(result),
                pending: None,
                waiting_for_operand: true,
                history: state.history.record(entry),
                ..state.clone()
            }
        }
        Err(kind) => raise(state, kind),
    }
}

fn backspace(state: &CalculatorState) -> CalculatorState {
    if state.has_error() || state.waiting_for_operand {
        return state.clone();
    }

    let mut display = state.display.clone();
    display.pop();
    if display.is_empty() || display == "-" {
        display = "0".to_string();
    }

    CalculatorState {
        display,
        ..state.clone()
    }
}

fn square_root(state: &CalculatorState) -> CalculatorState {
    let value = current(state);
    if value < 0.0 {
        return raise(state, CalcError::NegativeSquareRoot);
    }

    CalculatorState {
        display: format_number(value.sqrt()),
        waiting_for_operand: true,
        ..state.clone()
    }
}

fn accumulate(state: &CalculatorState, operator: Operator) -> CalculatorState {
    match operator.apply(state.memory, current(state)) {
        Ok(memory) => CalculatorState {
            memory,
            ..state.clone()
        },
        Err(kind) => raise(state, kind),
    }
}

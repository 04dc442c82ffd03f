//! Calculation history tracking.
//!
//! Provides an immutable, capped record of completed calculations,
//! following functional programming principles.

use super::action::{Operator, Stamp};
use super::format::format_number;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in history.
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// Record of a single completed calculation.
///
/// Entries are immutable values. The same shape is used for the persisted
/// JSON record, with `timestamp` serialized as an ISO-8601 string.
///
/// # Example
///
/// ```rust
/// use reckon::core::{HistoryEntry, Operator, Stamp};
///
/// let entry = HistoryEntry::from_calculation(Stamp::now(), 2.0, Operator::Add, 3.0, 5.0);
/// assert_eq!(entry.expression, "2 + 3");
/// assert_eq!(entry.result, 5.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier of the calculation
    pub id: String,
    /// `"A op B"` using formatted operands
    pub expression: String,
    /// The computed value
    pub result: f64,
    /// When the calculation completed
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Build an entry for `lhs op rhs = result`.
    pub fn from_calculation(
        stamp: Stamp,
        lhs: f64,
        operator: Operator,
        rhs: f64,
        result: f64,
    ) -> Self {
        Self {
            id: stamp.id,
            expression: format!(
                "{} {} {}",
                format_number(lhs),
                operator,
                format_number(rhs)
            ),
            result,
            timestamp: stamp.at,
        }
    }
}

/// Newest-first list of calculations, capped at [`MAX_HISTORY_ENTRIES`].
///
/// History is immutable - `record` and `replace` return a new history,
/// leaving the original untouched.
///
/// # Example
///
/// ```rust
/// use reckon::core::{History, HistoryEntry, Operator, Stamp};
///
/// let history = History::new();
/// let first = HistoryEntry::from_calculation(Stamp::now(), 1.0, Operator::Add, 1.0, 2.0);
/// let second = HistoryEntry::from_calculation(Stamp::now(), 2.0, Operator::Multiply, 4.0, 8.0);
///
/// let history = history.record(first).record(second);
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.latest().unwrap().expression, "2 * 4");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<HistoryEntry>", into = "Vec<HistoryEntry>")]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an entry at the front, dropping the oldest past the cap.
    pub fn record(&self, entry: HistoryEntry) -> Self {
        let mut entries = Vec::with_capacity(MAX_HISTORY_ENTRIES);
        entries.push(entry);
        entries.extend(
            self.entries
                .iter()
                .take(MAX_HISTORY_ENTRIES - 1)
                .cloned(),
        );
        Self { entries }
    }

    /// Replace the whole list, keeping the newest [`MAX_HISTORY_ENTRIES`].
    ///
    /// `entries` must already be ordered newest-first.
    pub fn replace(entries: Vec<HistoryEntry>) -> Self {
        let mut entries = entries;
        entries.truncate(MAX_HISTORY_ENTRIES);
        Self { entries }
    }

    /// The most recent calculation, if any.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<HistoryEntry>> for History {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self::replace(entries)
    }
}

impl From<History> for Vec<HistoryEntry> {
    fn from(history: History) -> Self {
        history.entries
    }
}

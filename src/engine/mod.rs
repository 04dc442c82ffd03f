//! The imperative shell around the pure core.
//!
//! [`Calculator`] owns the state, feeds actions through
//! [`crate::core::reduce`], publishes every new state to subscribers and
//! persists history in detached tasks after transitions that change it.

mod calculator;

pub use calculator::Calculator;

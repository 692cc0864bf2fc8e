//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where a core
//! operation (config validation, clock movement) can fail underneath them.

use thiserror::Error;

use crate::SimTime;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("clock cannot move backwards from {now} to {requested}")]
    ClockRewind { now: SimTime, requested: SimTime },
}

/// Shorthand result type for `rd-core`.
pub type CoreResult<T> = Result<T, CoreError>;

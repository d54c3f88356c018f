//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where a
//! configuration problem has to cross a crate boundary.

use thiserror::Error;

/// Errors raised while validating configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `taxi-core`.
pub type CoreResult<T> = Result<T, CoreError>;

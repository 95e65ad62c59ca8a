//! Error types for the exchange core.
//!
//! Matching itself is infallible; only requests that name an unknown
//! security, carry invalid arguments, or re-list a symbol fail, and
//! they fail before any state is touched.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The requested symbol is not listed.
    #[error("symbol not listed: {0}")]
    NotFound(String),

    /// Malformed request, e.g. zero shares or a non-positive limit price.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The symbol is already listed.
    #[error("symbol already listed: {0}")]
    AlreadyExists(String),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

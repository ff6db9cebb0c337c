//! Error types shared by all core operations.
//!
//! Every domain error maps onto one of four kinds that propagate unchanged
//! to the boundary: `NotFound`, `Conflict`, `Unauthorized` and
//! `InvalidArgument`. Store I/O failures bubble up as `Store` without any
//! local recovery or retry.

use thiserror::Error;

/// Error type for core domain operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A referenced profile, friendship or conversation does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A duplicate relationship request for an already-related pair.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The acting user lacks standing for the requested transition or read.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed coordinates, radius or filter input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The underlying document store failed.
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

//! Error types for the RustStack core.

/// Core error type for RustStack infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum RustStackError {
    /// Unknown AWS partition identifier.
    #[error("unknown AWS partition: {0}")]
    UnknownPartition(String),
}

/// Convenience result type for RustStack operations.
pub type RustStackResult<T> = Result<T, RustStackError>;

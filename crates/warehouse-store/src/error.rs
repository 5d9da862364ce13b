use std::io;
use std::path::PathBuf;

use warehouse_types::ValueError;

/// Errors from warehouse storage operations.
///
/// The default `Warehouse` surface swallows these after logging them;
/// callers see them only through [`try_write`](crate::Warehouse::try_write)
/// or the [diagnostics hook](crate::DiagnosticHook).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The value cannot survive a JSON round trip (non-finite number).
    #[error("value is not representable: {0}")]
    NotRepresentable(#[from] ValueError),

    /// Envelope serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O failure at a specific path.
    #[error("I/O error at {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// A write was issued through a handle bound to an in-memory value.
    /// Nested values are persisted only by the top-level write.
    #[error("warehouse is bound to an in-memory value, not a file")]
    NotFileBacked,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

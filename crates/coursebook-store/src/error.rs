//! Document store error types.
//!
//! These exist only inside the store implementations, for classification
//! and logging. They never cross the `DocumentStore` boundary: every
//! failure is converted to "absent" before callers see it.

use thiserror::Error;

/// Why a document failed to resolve.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} for {path}")]
    Status { status: u16, path: String },

    /// The response body was not parseable as a document.
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// A network-level failure (connect, timeout, DNS).
    #[error("network error for {path}: {message}")]
    Network { path: String, message: String },
}

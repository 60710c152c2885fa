//! Error types for the serde layer.

/// Errors from converting between documents and serde types.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Resolving the pointer failed.
    #[error("{0}")]
    Pointer(#[from] structptr_core::Error),

    /// A Rust value couldn't be turned into a document.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// A document couldn't be turned into the requested Rust type.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result type alias for serde layer operations.
pub type Result<T> = std::result::Result<T, Error>;

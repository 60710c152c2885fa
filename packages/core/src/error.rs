//! Error types for pointer parsing and traversal.

use crate::coerce::CoercionError;
use crate::pointer::Pointer;
use crate::value::Kind;

/// The machine-checkable category of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    NotFound,
    OutOfRange,
    Coercion,
    InvalidKind,
}

/// Errors from parsing a pointer or resolving it against a document.
///
/// Every traversal error carries the full pointer text and the 0-based index
/// of the segment being resolved when it failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The pointer text is malformed.
    #[error("parse pointer {pointer:?}: {message}")]
    Parse { pointer: String, message: String },

    /// A map key or record field doesn't exist.
    #[error("{pointer} at part {segment}: couldn't find {what}")]
    NotFound {
        pointer: String,
        segment: usize,
        what: String,
    },

    /// A sequence index is negative or past the end.
    #[error("{pointer} at part {segment}: index {index} is out of range (length = {len})")]
    OutOfRange {
        pointer: String,
        segment: usize,
        index: i64,
        len: usize,
    },

    /// A segment or value couldn't be converted to the type the document requires.
    #[error("{pointer} at part {segment}: {source}")]
    Coercion {
        pointer: String,
        segment: usize,
        #[source]
        source: CoercionError,
    },

    /// The value at this point can't be navigated or mutated this way.
    #[error("{pointer} at part {segment}: invalid value kind: {kind}")]
    InvalidKind {
        pointer: String,
        segment: usize,
        kind: String,
    },
}

/// Result type alias for pointer operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse { .. } => ErrorKind::Parse,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::OutOfRange { .. } => ErrorKind::OutOfRange,
            Error::Coercion { .. } => ErrorKind::Coercion,
            Error::InvalidKind { .. } => ErrorKind::InvalidKind,
        }
    }

    /// The pointer text the error refers to.
    pub fn pointer(&self) -> &str {
        match self {
            Error::Parse { pointer, .. }
            | Error::NotFound { pointer, .. }
            | Error::OutOfRange { pointer, .. }
            | Error::Coercion { pointer, .. }
            | Error::InvalidKind { pointer, .. } => pointer,
        }
    }

    /// The segment index where traversal failed. `None` for parse errors.
    pub fn segment(&self) -> Option<usize> {
        match self {
            Error::Parse { .. } => None,
            Error::NotFound { segment, .. }
            | Error::OutOfRange { segment, .. }
            | Error::Coercion { segment, .. }
            | Error::InvalidKind { segment, .. } => Some(*segment),
        }
    }

    pub(crate) fn parse(input: &str, message: impl Into<String>) -> Self {
        Error::Parse {
            pointer: input.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(pointer: &Pointer, segment: usize, what: impl Into<String>) -> Self {
        Error::NotFound {
            pointer: pointer.to_string(),
            segment,
            what: what.into(),
        }
    }

    pub(crate) fn out_of_range(pointer: &Pointer, segment: usize, index: i64, len: usize) -> Self {
        Error::OutOfRange {
            pointer: pointer.to_string(),
            segment,
            index,
            len,
        }
    }

    pub(crate) fn coercion(pointer: &Pointer, segment: usize, source: CoercionError) -> Self {
        Error::Coercion {
            pointer: pointer.to_string(),
            segment,
            source,
        }
    }

    pub(crate) fn invalid_kind(pointer: &Pointer, segment: usize, kind: Kind) -> Self {
        Error::InvalidKind {
            pointer: pointer.to_string(),
            segment,
            kind: kind.to_string(),
        }
    }

    pub(crate) fn hook_rejected(pointer: &Pointer, segment: usize, kind: Kind) -> Self {
        Error::InvalidKind {
            pointer: pointer.to_string(),
            segment,
            kind: format!("value hook returned nothing for {}", kind),
        }
    }
}

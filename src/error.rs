use std::io;

use thiserror::Error;

/// Errors raised by the simulation core.
///
/// None of these are recoverable for the operation that produced them: the
/// run cannot proceed with the offending configuration or input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Tabular mode was requested on a policy that has a fixed shape.
    #[error("{policy} mapping cannot switch its tabular representation")]
    TabularForbidden { policy: &'static str },

    /// Feedback was sent to an algorithm that keeps no usage history.
    #[error("{algorithm} replacement does not take feedback")]
    Unsupported { algorithm: &'static str },

    /// Page 0 marks an empty slot and can't be referenced.
    #[error("page 0 is reserved for empty slots")]
    ReservedPage,

    #[error("cache capacity {0} is not a usable power of two")]
    Capacity(usize),

    #[error("{mapping} mapping needs a replacement algorithm")]
    MissingReplacement { mapping: &'static str },

    #[error("direct mapping overwrites in place and takes no replacement algorithm")]
    UnexpectedReplacement,
}

/// Errors from loading a run configuration or a page trace.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("trace line {line}: '{text}' is not a page number")]
    BadPage { line: usize, text: String },

    #[error("trace reader stopped unexpectedly")]
    ReaderGone,
}

use std::{fmt, io};
use thiserror::Error;

/// Unified error type for all ticktab operations.
///
/// The variants follow the failure taxonomy of the ticking-table engine: key-set
/// conflicts, missing keys, fill bounds violations, protocol violations coming
/// from the server, and a poisoned state after an update failed half way.
///
/// # Error Handling Strategy
///
/// Errors propagate upward with `?`. Inside `apply_update` every error is fatal
/// to that update; the subscription worker reports the first error through the
/// subscriber's failure callback and stops processing. Nothing is retried: a
/// protocol-level failure requires a fresh subscription.
///
/// # Thread Safety
///
/// `Error` is `Send` and `Sync` so the worker thread can hand it to callbacks
/// living on other threads.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error, in practice only raised when the subscription worker thread
    /// cannot be spawned.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrow library error while converting incoming column data or exporting
    /// snapshot columns to Arrow arrays.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Invalid API parameter, e.g. a reversed key range or a column index that
    /// does not exist.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// A key range was added to a row-key set builder but some of its keys are
    /// already present.
    ///
    /// Adjacent ranges merge silently; overlapping ranges are a caller bug.
    #[error("range [{first}, {last_exclusive}) overlaps keys already in the set")]
    OverlapError { first: u64, last_exclusive: u64 },

    /// The space mapper was asked to add (or shift onto) a key that is already
    /// mapped. This signals a protocol violation by the server or a bug.
    #[error("key {0} is already mapped")]
    DuplicateKeyError(u64),

    /// A remove, shift, or modify referenced a key that is not present.
    #[error("key {0} was not found")]
    KeyNotFoundError(u64),

    /// An index-space position is beyond the end of a column.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRangeError { index: u64, len: u64 },

    /// A fill destination (or source) holds fewer elements than the row set
    /// being transferred.
    #[error("capacity error: {required} elements required but buffer holds {available}")]
    CapacityError { required: usize, available: usize },

    /// Two columns or buffers hold different element types.
    #[error("column type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Structural violation of the streaming protocol, e.g. a message carrying
    /// both add and modify batches, or shift sequences of different lengths.
    ///
    /// Fatal to the subscription.
    #[error("protocol violation: {0}")]
    ProtocolError(String),

    /// Explicitly unsupported path. Kept distinct from the "real" errors above
    /// so callers can tell a gap from a failure.
    #[error("not yet implemented: {0}")]
    NotYetImplementedError(String),

    /// The table state refused an update because an earlier update failed
    /// after it had started mutating storage.
    #[error("table state is poisoned by an earlier failed update")]
    PoisonedError,

    /// Internal error indicating a bug or unexpected state.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a protocol error from any displayable message.
    ///
    /// # Examples
    ///
    /// ```
    /// use ticktab_result::Error;
    ///
    /// let err = Error::protocol("message has both add and mod batches");
    /// assert!(matches!(err, Error::ProtocolError(msg) if msg.contains("both")));
    /// ```
    #[inline]
    pub fn protocol<M: fmt::Display>(message: M) -> Self {
        Error::ProtocolError(message.to_string())
    }

    /// Create a type-mismatch error from the two offending type descriptions.
    #[inline]
    pub fn type_mismatch<E: fmt::Display, F: fmt::Display>(expected: E, found: F) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Whether the error ends the subscription it was raised in.
    ///
    /// Every error raised while applying an update is fatal; only argument
    /// errors raised by read-side helpers (snapshot lookups, fills requested by
    /// a subscriber) leave the subscription intact.
    pub fn is_fatal_to_subscription(&self) -> bool {
        !matches!(
            self,
            Error::InvalidArgumentError(_)
                | Error::CapacityError { .. }
                | Error::IndexOutOfRangeError { .. }
        )
    }
}

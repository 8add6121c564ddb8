use crate::error::Error;

/// Result type alias used throughout ticktab.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types and result definitions for the ticktab workspace.
//!
//! Every ticktab crate returns [`Result<T>`] with the single [`Error`] enum
//! defined here, so errors flow across crate boundaries with `?` and the
//! subscription worker can report them through one failure channel.
//!
//! # Error Categories
//!
//! - **Key-set conflicts** ([`Error::OverlapError`], [`Error::DuplicateKeyError`])
//! - **Missing keys** ([`Error::KeyNotFoundError`])
//! - **Fill bounds** ([`Error::IndexOutOfRangeError`], [`Error::CapacityError`])
//! - **Protocol violations** ([`Error::ProtocolError`])
//! - **Data format errors** ([`Error::Arrow`], [`Error::TypeMismatch`])
//! - **State errors** ([`Error::PoisonedError`], [`Error::Internal`])

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;

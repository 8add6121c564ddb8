//! Ordered row-key sets shared across ticktab crates.
//!
//! A [`RowKeySet`] is an immutable, cheaply cloneable set of non-negative
//! integer keys stored as maximal contiguous runs. Sets are assembled with a
//! [`RowKeySetBuilder`], which accepts ranges in any order and merges adjacent
//! ones, then frozen with [`RowKeySetBuilder::build`].
//!
//! The same type carries keys in two different spaces: *key space* (the
//! logical row identifiers sent by the server) and *index space* (dense
//! positions into column storage). Which one a given set holds is a property of
//! where it came from, not of the type.
//!
//! ```
//! use ticktab_rowset::RowKeySetBuilder;
//!
//! let mut builder = RowKeySetBuilder::new();
//! builder.add_range(0, 3).unwrap();
//! builder.add_range(5, 8).unwrap();
//! builder.add_range(3, 5).unwrap();
//! let set = builder.build();
//!
//! let mut runs = Vec::new();
//! set.for_each_run(|first, last| runs.push((first, last)));
//! assert_eq!(runs, vec![(0, 7)]);
//! ```

pub mod builder;
pub mod iter;
pub mod set;

pub use builder::RowKeySetBuilder;
pub use iter::Keys;
pub use set::RowKeySet;

/// Identifier of a row, in either key space or index space.
pub type RowKey = u64;

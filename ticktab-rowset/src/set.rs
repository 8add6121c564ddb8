use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use ticktab_result::Result;

use crate::RowKey;
use crate::builder::RowKeySetBuilder;
use crate::iter::Keys;

/// Immutable ordered set of row keys.
///
/// Internally a shared slice of disjoint, non-adjacent, ascending
/// `[begin, end)` runs. Cloning shares the slice; sets are never mutated after
/// they are built, so they can be handed between threads and snapshots freely.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RowKeySet {
    runs: Arc<[(RowKey, RowKey)]>,
    len: u64,
}

impl Default for RowKeySet {
    fn default() -> Self {
        Self::empty()
    }
}

impl RowKeySet {
    pub(crate) fn from_sorted_runs(runs: Vec<(RowKey, RowKey)>, len: u64) -> Self {
        debug_assert!(runs.windows(2).all(|w| w[0].1 < w[1].0));
        debug_assert_eq!(runs.iter().map(|(b, e)| e - b).sum::<u64>(), len);
        Self {
            runs: Arc::from(runs),
            len,
        }
    }

    pub fn empty() -> Self {
        Self::from_sorted_runs(Vec::new(), 0)
    }

    /// The contiguous set `[begin, end)`; empty when `begin >= end`.
    pub fn from_range(begin: RowKey, end: RowKey) -> Self {
        if begin >= end {
            return Self::empty();
        }
        Self::from_sorted_runs(vec![(begin, end)], end - begin)
    }

    /// Build a set from keys in any order. Duplicates are an overlap error.
    pub fn from_keys<I: IntoIterator<Item = RowKey>>(keys: I) -> Result<Self> {
        let mut builder = RowKeySetBuilder::new();
        for key in keys {
            builder.add(key)?;
        }
        Ok(builder.build())
    }

    /// Build a set from `[begin, end)` ranges in any order.
    pub fn from_ranges<I: IntoIterator<Item = Range<RowKey>>>(ranges: I) -> Result<Self> {
        let mut builder = RowKeySetBuilder::new();
        for range in ranges {
            builder.add_range(range.start, range.end)?;
        }
        Ok(builder.build())
    }

    /// Number of keys in the set.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of maximal contiguous runs.
    #[inline]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn first(&self) -> Option<RowKey> {
        self.runs.first().map(|&(begin, _)| begin)
    }

    pub fn last(&self) -> Option<RowKey> {
        self.runs.last().map(|&(_, end)| end - 1)
    }

    pub fn contains(&self, key: RowKey) -> bool {
        let idx = self.runs.partition_point(|&(begin, _)| begin <= key);
        idx > 0 && self.runs[idx - 1].1 > key
    }

    /// Keys in ascending order. Call `.rev()` for descending order.
    pub fn iter(&self) -> Keys<'_> {
        Keys::new(&self.runs, self.len)
    }

    /// Keys in descending order.
    pub fn iter_rev(&self) -> std::iter::Rev<Keys<'_>> {
        self.iter().rev()
    }

    /// Maximal runs as `[begin, end)` ranges, ascending.
    pub fn runs(&self) -> impl DoubleEndedIterator<Item = Range<RowKey>> + ExactSizeIterator + '_ {
        self.runs.iter().map(|&(begin, end)| begin..end)
    }

    /// Call `f(first, last_inclusive)` for every maximal run, ascending.
    pub fn for_each_run<F>(&self, mut f: F)
    where
        F: FnMut(RowKey, RowKey),
    {
        for &(begin, end) in self.runs.iter() {
            f(begin, end - 1);
        }
    }

    /// Fallible variant of [`RowKeySet::for_each_run`]; stops at the first error.
    pub fn try_for_each_run<F, E>(&self, mut f: F) -> std::result::Result<(), E>
    where
        F: FnMut(RowKey, RowKey) -> std::result::Result<(), E>,
    {
        for &(begin, end) in self.runs.iter() {
            f(begin, end - 1)?;
        }
        Ok(())
    }

    /// The first `n` keys (all of them when `n >= len`).
    pub fn take(&self, n: u64) -> Self {
        if n >= self.len {
            return self.clone();
        }
        let mut out = Vec::new();
        let mut remaining = n;
        for &(begin, end) in self.runs.iter() {
            if remaining == 0 {
                break;
            }
            let width = (end - begin).min(remaining);
            out.push((begin, begin + width));
            remaining -= width;
        }
        Self::from_sorted_runs(out, n)
    }

    /// Everything but the first `n` keys.
    pub fn drop(&self, n: u64) -> Self {
        if n == 0 {
            return self.clone();
        }
        if n >= self.len {
            return Self::empty();
        }
        let mut out = Vec::new();
        let mut skip = n;
        for &(begin, end) in self.runs.iter() {
            let width = end - begin;
            if skip >= width {
                skip -= width;
                continue;
            }
            out.push((begin + skip, end));
            skip = 0;
        }
        Self::from_sorted_runs(out, self.len - n)
    }

    pub fn to_vec(&self) -> Vec<RowKey> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a RowKeySet {
    type Item = RowKey;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for RowKeySet {
    /// Runs separated by commas: `[0..4],[6],[9..10]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for &(begin, end) in self.runs.iter() {
            if end - begin == 1 {
                write!(f, "{sep}[{begin}]")?;
            } else {
                write!(f, "{sep}[{begin}..{}]", end - 1)?;
            }
            sep = ",";
        }
        Ok(())
    }
}

impl fmt::Debug for RowKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowKeySet({}; {self})", self.len)
    }
}

//! Key space <-> index space translation.
//!
//! The mapper holds the set of keys currently present in a table. The index
//! of a key is its rank among present keys, so the `i`-th row of every column
//! store belongs to the `i`-th smallest key. Operations work on whole ranges
//! and report the index at which the range starts, which is exactly the
//! splice position the column stores need.

use roaring::RoaringTreemap;
use ticktab_result::{Error, Result};
use ticktab_rowset::{RowKey, RowKeySet, RowKeySetBuilder};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaceMapper {
    keys: RoaringTreemap,
}

impl SpaceMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of present keys (and therefore rows).
    #[inline]
    pub fn len(&self) -> u64 {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: RowKey) -> bool {
        self.keys.contains(key)
    }

    /// Index of `key`, or `None` when it is absent.
    pub fn index_of(&self, key: RowKey) -> Option<u64> {
        self.contains(key).then(|| self.count_below(key))
    }

    /// Key stored at `index`, or `None` when `index >= len`.
    pub fn key_at(&self, index: u64) -> Option<RowKey> {
        self.keys.select(index)
    }

    /// Insert the keys `[begin, end)` and return the index of `begin` after
    /// insertion.
    ///
    /// Fails with [`Error::DuplicateKeyError`] naming the first already
    /// present key; the mapper is unchanged on failure. An empty range
    /// inserts nothing and returns 0.
    pub fn add_range(&mut self, begin: RowKey, end: RowKey) -> Result<u64> {
        check_range(begin, end)?;
        if begin == end {
            return Ok(0);
        }
        if self.count_in(begin, end) != 0 {
            let first = self.first_at_or_after(begin).unwrap_or(begin);
            return Err(Error::DuplicateKeyError(first));
        }
        self.keys.insert_range(begin..end);
        Ok(self.count_below(begin))
    }

    /// Remove the keys `[begin, end)` and return the index `begin` had
    /// before removal.
    ///
    /// Every key in the range must be present; otherwise the mapper is
    /// unchanged and [`Error::KeyNotFoundError`] names the first missing key.
    /// An empty range removes nothing and returns 0.
    pub fn erase_range(&mut self, begin: RowKey, end: RowKey) -> Result<u64> {
        check_range(begin, end)?;
        if begin == end {
            return Ok(0);
        }
        self.require_present(begin, end)?;
        let index = self.count_below(begin);
        self.keys.remove_range(begin..end);
        Ok(index)
    }

    /// Renumber the present keys in `[begin, end)` so that `begin` maps to
    /// `dest`. Index positions do not change.
    ///
    /// Keys outside the source range must not lie where the shifted keys
    /// land or between them. A collision is a [`Error::DuplicateKeyError`];
    /// any other reordering, and a destination past the end of the key
    /// space, is a [`Error::ProtocolError`]. Nothing is changed on failure.
    pub fn apply_shift(&mut self, begin: RowKey, end: RowKey, dest: RowKey) -> Result<()> {
        check_range(begin, end)?;
        if begin == end || begin == dest {
            return Ok(());
        }
        let source = self.keys_in(begin, end);
        let (Some(&first), Some(&last)) = (source.first(), source.last()) else {
            return Ok(());
        };

        // Foreign keys between the moved keys' old and new positions, inclusive.
        let (window_first, window_last) = if dest > begin {
            let delta = dest - begin;
            let landing = last.checked_add(delta).ok_or_else(|| {
                Error::protocol(format!(
                    "shift [{begin}, {end}) -> {dest} moves key {last} out of the key space"
                ))
            })?;
            (last + 1, landing)
        } else {
            let delta = begin - dest;
            (first - delta, first - 1)
        };
        let foreign = self
            .first_at_or_after(window_first)
            .filter(|&k| k <= window_last);
        if let Some(foreign) = foreign {
            let origin = if dest > begin {
                foreign.checked_sub(dest - begin)
            } else {
                foreign.checked_add(begin - dest)
            };
            if origin.is_some_and(|o| (begin..end).contains(&o) && self.contains(o)) {
                return Err(Error::DuplicateKeyError(foreign));
            }
            return Err(Error::protocol(format!(
                "shift [{begin}, {end}) -> {dest} would move keys past key {foreign}"
            )));
        }

        tracing::trace!(begin, end, dest, keys = source.len(), "shifting keys");
        if dest > begin {
            let delta = dest - begin;
            self.relocate(source.into_iter().rev(), |k| k + delta);
        } else {
            let delta = begin - dest;
            self.relocate(source.into_iter(), |k| k - delta);
        }
        Ok(())
    }

    /// Translate present keys to their indices.
    ///
    /// Fails with [`Error::KeyNotFoundError`] on the first absent key.
    pub fn keys_to_index_space(&self, keys: &RowKeySet) -> Result<RowKeySet> {
        let mut builder = RowKeySetBuilder::new();
        keys.try_for_each_run(|first, last| {
            let end = last + 1;
            self.require_present(first, end)?;
            let index = self.count_below(first);
            builder.add_range(index, index + (end - first))
        })?;
        Ok(builder.build())
    }

    /// The present keys as a row-key set.
    pub fn row_keys(&self) -> Result<RowKeySet> {
        let mut runs: Vec<std::ops::Range<RowKey>> = Vec::new();
        for key in self.keys.iter() {
            match runs.last_mut() {
                Some(run) if run.end == key => run.end = key + 1,
                _ => runs.push(key..key + 1),
            }
        }
        RowKeySet::from_ranges(runs)
    }

    /// Number of present keys strictly below `key`.
    #[inline]
    fn count_below(&self, key: RowKey) -> u64 {
        if key == 0 { 0 } else { self.keys.rank(key - 1) }
    }

    /// Number of present keys in `[begin, end)`.
    #[inline]
    fn count_in(&self, begin: RowKey, end: RowKey) -> u64 {
        self.count_below(end) - self.count_below(begin)
    }

    fn first_at_or_after(&self, key: RowKey) -> Option<RowKey> {
        self.keys.select(self.count_below(key))
    }

    fn keys_in(&self, begin: RowKey, end: RowKey) -> Vec<RowKey> {
        let first = self.count_below(begin);
        let count = self.count_in(begin, end);
        (first..first + count)
            .filter_map(|index| self.keys.select(index))
            .collect()
    }

    fn require_present(&self, begin: RowKey, end: RowKey) -> Result<()> {
        let present = self.count_in(begin, end);
        if present == end - begin {
            return Ok(());
        }
        // Present keys form a prefix `[begin, begin + run)`; find its length.
        let base = self.count_below(begin);
        let (mut lo, mut hi) = (0u64, end - begin);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.keys.select(base + mid) == Some(begin + mid) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        Err(Error::KeyNotFoundError(begin + lo))
    }

    /// Move `keys` one at a time in the given order.
    fn relocate<I, F>(&mut self, keys: I, target: F)
    where
        I: Iterator<Item = RowKey>,
        F: Fn(RowKey) -> RowKey,
    {
        for key in keys {
            self.keys.remove(key);
            self.keys.insert(target(key));
        }
    }
}

fn check_range(begin: RowKey, end: RowKey) -> Result<()> {
    if begin > end {
        return Err(Error::InvalidArgumentError(format!(
            "reversed key range [{begin}, {end})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper_with(ranges: &[(u64, u64)]) -> SpaceMapper {
        let mut m = SpaceMapper::new();
        for &(b, e) in ranges {
            m.add_range(b, e).unwrap();
        }
        m
    }

    #[test]
    fn add_returns_index_of_begin() {
        let mut m = SpaceMapper::new();
        assert_eq!(m.add_range(10, 20).unwrap(), 0);
        assert_eq!(m.add_range(0, 5).unwrap(), 0);
        assert_eq!(m.add_range(5, 10).unwrap(), 5);
        assert_eq!(m.len(), 20);
        assert_eq!(m.add_range(7, 7).unwrap(), 0);
    }

    #[test]
    fn add_of_present_key_names_first_duplicate() {
        let mut m = mapper_with(&[(10, 20)]);
        assert!(matches!(m.add_range(5, 12), Err(Error::DuplicateKeyError(10))));
        assert_eq!(m.len(), 10);
        assert!(!m.contains(5));
    }

    #[test]
    fn erase_returns_index_before_removal() {
        let mut m = mapper_with(&[(0, 10)]);
        assert_eq!(m.erase_range(3, 5).unwrap(), 3);
        assert_eq!(m.erase_range(5, 7).unwrap(), 3);
        assert_eq!(m.len(), 6);
        assert_eq!(m.key_at(3), Some(7));
    }

    #[test]
    fn erase_with_gap_names_first_missing_key() {
        let mut m = mapper_with(&[(0, 3), (4, 8)]);
        assert!(matches!(m.erase_range(1, 6), Err(Error::KeyNotFoundError(3))));
        assert_eq!(m.len(), 7);
    }

    #[test]
    fn index_and_key_lookups_agree() {
        let m = mapper_with(&[(3, 5), (100, 102)]);
        assert_eq!(m.index_of(100), Some(2));
        assert_eq!(m.index_of(50), None);
        assert_eq!(m.key_at(3), Some(101));
        assert_eq!(m.key_at(4), None);
        assert_eq!(m.row_keys().unwrap().to_string(), "[3..4],[100..101]");
    }

    #[test]
    fn keys_to_index_space_merges_adjacent_indices() {
        let m = mapper_with(&[(0, 2), (10, 12)]);
        let keys = RowKeySet::from_keys([1, 10, 11]).unwrap();
        assert_eq!(m.keys_to_index_space(&keys).unwrap().to_string(), "[1..3]");
        let missing = RowKeySet::from_keys([1, 5]).unwrap();
        assert!(matches!(
            m.keys_to_index_space(&missing),
            Err(Error::KeyNotFoundError(5))
        ));
    }

    #[test]
    fn positive_shift_processed_ascending_clobbers() {
        let mut m = mapper_with(&[(10, 20)]);
        m.relocate(10..20, |k| k + 5);
        assert!(m.len() < 10);

        let mut m = mapper_with(&[(10, 20)]);
        m.relocate((10..20).rev(), |k| k + 5);
        assert_eq!(m.row_keys().unwrap().to_string(), "[15..24]");
    }

    #[test]
    fn shift_with_empty_source_is_noop() {
        let mut m = mapper_with(&[(0, 3)]);
        m.apply_shift(10, 20, 100).unwrap();
        assert_eq!(m.row_keys().unwrap().to_string(), "[0..2]");
    }

    #[test]
    fn shift_past_key_space_end_is_protocol_error() {
        let mut m = mapper_with(&[(0, 3)]);
        assert!(matches!(
            m.apply_shift(0, 3, u64::MAX - 1),
            Err(Error::ProtocolError(_))
        ));
    }

    #[test]
    fn reversed_range_is_invalid_argument() {
        let mut m = SpaceMapper::new();
        assert!(matches!(
            m.add_range(5, 3),
            Err(Error::InvalidArgumentError(_))
        ));
    }
}

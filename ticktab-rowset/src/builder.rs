use std::collections::BTreeMap;
use std::ops::Bound;

use ticktab_result::{Error, Result};

use crate::RowKey;
use crate::set::RowKeySet;

/// Construction-only mutable phase of a [`RowKeySet`].
///
/// Ranges are kept in an ordered map keyed by range start, so inserting a range
/// and merging it with its left and right neighbours costs O(log n).
#[derive(Debug, Default, Clone)]
pub struct RowKeySetBuilder {
    /// start -> end (exclusive); no two entries overlap or touch.
    ranges: BTreeMap<RowKey, RowKey>,
    len: u64,
}

impl RowKeySetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys added so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert every key in `[first, last_exclusive)`.
    ///
    /// Fails with [`Error::OverlapError`] if any key is already present; the
    /// builder is left unchanged in that case.
    pub fn add_range(&mut self, first: RowKey, last_exclusive: RowKey) -> Result<()> {
        if first > last_exclusive {
            return Err(Error::InvalidArgumentError(format!(
                "reversed key range [{first}, {last_exclusive})"
            )));
        }
        if first == last_exclusive {
            return Ok(());
        }

        let overlap = || Error::OverlapError {
            first,
            last_exclusive,
        };

        let mut begin = first;
        let mut end = last_exclusive;

        if let Some((&left_begin, &left_end)) = self.ranges.range(..=first).next_back() {
            if left_end > first {
                return Err(overlap());
            }
            if left_end == first {
                begin = left_begin;
            }
        }

        let mut merge_right = None;
        if let Some((&right_begin, &right_end)) = self
            .ranges
            .range((Bound::Excluded(first), Bound::Unbounded))
            .next()
        {
            if right_begin < last_exclusive {
                return Err(overlap());
            }
            if right_begin == last_exclusive {
                end = right_end;
                merge_right = Some(right_begin);
            }
        }

        if let Some(right_begin) = merge_right {
            self.ranges.remove(&right_begin);
        }
        // When merging left, `begin` is the left neighbour's key and this
        // overwrites its end in place.
        self.ranges.insert(begin, end);
        self.len += last_exclusive - first;
        Ok(())
    }

    /// Insert a single key.
    #[inline]
    pub fn add(&mut self, key: RowKey) -> Result<()> {
        let last_exclusive = key.checked_add(1).ok_or_else(|| {
            Error::InvalidArgumentError(format!("key {key} is not representable"))
        })?;
        self.add_range(key, last_exclusive)
    }

    /// Freeze the builder into an immutable set.
    pub fn build(self) -> RowKeySet {
        RowKeySet::from_sorted_runs(self.ranges.into_iter().collect(), self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    fn runs(set: &RowKeySet) -> Vec<(RowKey, RowKey)> {
        let mut out = Vec::new();
        set.for_each_run(|first, last| out.push((first, last)));
        out
    }

    #[test]
    fn merges_left_and_right_neighbours() {
        let mut b = RowKeySetBuilder::new();
        b.add_range(0, 3).unwrap();
        b.add_range(5, 8).unwrap();
        b.add_range(3, 5).unwrap();
        let set = b.build();
        assert_eq!(runs(&set), vec![(0, 7)]);
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn keeps_gaps_between_ranges() {
        let mut b = RowKeySetBuilder::new();
        b.add_range(10, 12).unwrap();
        b.add(20).unwrap();
        b.add_range(0, 2).unwrap();
        assert_eq!(runs(&b.build()), vec![(0, 1), (10, 11), (20, 20)]);
    }

    #[test]
    fn rejects_overlap_without_mutating() {
        let mut b = RowKeySetBuilder::new();
        b.add_range(5, 10).unwrap();
        for (first, last) in [(0, 6), (9, 12), (6, 7), (5, 10), (2, 20)] {
            let err = b.add_range(first, last).unwrap_err();
            assert!(matches!(err, Error::OverlapError { .. }), "{first}..{last}");
        }
        assert_eq!(b.len(), 5);
        assert_eq!(runs(&b.build()), vec![(5, 9)]);
    }

    #[test]
    fn duplicate_point_is_overlap() {
        let mut b = RowKeySetBuilder::new();
        b.add(4).unwrap();
        assert!(matches!(b.add(4), Err(Error::OverlapError { .. })));
    }

    #[test]
    fn empty_and_reversed_ranges() {
        let mut b = RowKeySetBuilder::new();
        b.add_range(7, 7).unwrap();
        assert!(b.is_empty());
        assert!(matches!(
            b.add_range(8, 2),
            Err(Error::InvalidArgumentError(_))
        ));
        assert!(matches!(b.add(u64::MAX), Err(Error::InvalidArgumentError(_))));
        let set = b.build();
        assert!(set.is_empty());
        assert_eq!(set.run_count(), 0);
    }

    #[test]
    fn insertion_order_does_not_change_runs() {
        // Chop [0, 400) into random pieces, drop some of them, and insert the
        // survivors in random order. The runs must match a sequential merge.
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let mut pieces = Vec::new();
            let mut at = 0u64;
            while at < 400 {
                let width = 1 + (at * 7 + 3) % 5;
                pieces.push((at, (at + width).min(400)));
                at += width;
            }
            let kept: Vec<_> = pieces
                .iter()
                .copied()
                .enumerate()
                .filter(|(i, _)| i % 3 != 1)
                .map(|(_, p)| p)
                .collect();

            let mut expected = Vec::<(u64, u64)>::new();
            for &(b, e) in &kept {
                match expected.last_mut() {
                    Some(last) if last.1 == b => last.1 = e,
                    _ => expected.push((b, e)),
                }
            }
            let expected: Vec<_> = expected.into_iter().map(|(b, e)| (b, e - 1)).collect();

            let mut shuffled = kept.clone();
            shuffled.shuffle(&mut rng);
            let mut builder = RowKeySetBuilder::new();
            for (b, e) in shuffled {
                builder.add_range(b, e).unwrap();
            }
            assert_eq!(runs(&builder.build()), expected);
        }
    }
}

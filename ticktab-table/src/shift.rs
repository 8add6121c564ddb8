//! Key renumbering instructions carried by an update.

use ticktab_result::{Error, Result};
use ticktab_rowset::{RowKey, RowKeySet, RowKeySetBuilder};

/// Three parallel key sets describing shifts: the `i`-th shift moves the
/// keys in `[starts[i], ends[i]]` so that `starts[i]` becomes `dests[i]`.
///
/// `ends` are inclusive, matching the wire encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftSpec {
    pub starts: RowKeySet,
    pub ends: RowKeySet,
    pub dests: RowKeySet,
}

impl ShiftSpec {
    pub fn new(starts: RowKeySet, ends: RowKeySet, dests: RowKeySet) -> Self {
        Self {
            starts,
            ends,
            dests,
        }
    }

    /// Build from `(start, end_inclusive, dest)` triples in any order.
    pub fn from_triples<I>(triples: I) -> Result<Self>
    where
        I: IntoIterator<Item = (RowKey, RowKey, RowKey)>,
    {
        let mut starts = RowKeySetBuilder::new();
        let mut ends = RowKeySetBuilder::new();
        let mut dests = RowKeySetBuilder::new();
        for (start, end, dest) in triples {
            if end < start {
                return Err(Error::InvalidArgumentError(format!(
                    "shift end {end} precedes start {start}"
                )));
            }
            starts.add(start)?;
            ends.add(end)?;
            dests.add(dest)?;
        }
        Ok(Self::new(starts.build(), ends.build(), dests.build()))
    }

    pub fn len(&self) -> u64 {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty() && self.ends.is_empty() && self.dests.is_empty()
    }

    /// Fails with [`Error::ProtocolError`] unless the three sets have the same
    /// size and every range is well formed.
    pub fn validate(&self) -> Result<()> {
        if self.starts.len() != self.ends.len() || self.starts.len() != self.dests.len() {
            return Err(Error::protocol(format!(
                "shift sequences not of same size: starts {}, ends {}, dests {}",
                self.starts.len(),
                self.ends.len(),
                self.dests.len()
            )));
        }
        for (start, end) in self.starts.iter().zip(self.ends.iter()) {
            if end < start {
                return Err(Error::protocol(format!(
                    "shift end {end} precedes start {start}"
                )));
            }
        }
        Ok(())
    }

    /// The shifts as `(start, end_inclusive, dest)` triples, ascending by start.
    pub fn triples(&self) -> Vec<(RowKey, RowKey, RowKey)> {
        self.starts
            .iter()
            .zip(self.ends.iter())
            .zip(self.dests.iter())
            .map(|((s, e), d)| (s, e, d))
            .collect()
    }

    /// Call `f(begin, end_exclusive, dest)` for every shift in an order that
    /// never moves a key onto one that has yet to move: shifts toward lower
    /// keys first, lowest start first, then shifts toward higher keys,
    /// highest start first. Shifts with `dest == start` are skipped.
    pub fn for_each_shift<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(RowKey, RowKey, RowKey) -> Result<()>,
    {
        self.validate()?;
        let triples = self.triples();
        for &(start, end, dest) in triples.iter().filter(|(s, _, d)| d < s) {
            f(start, end + 1, dest)?;
        }
        for &(start, end, dest) in triples.iter().rev().filter(|(s, _, d)| d > s) {
            f(start, end + 1, dest)?;
        }
        Ok(())
    }
}

use std::iter::FusedIterator;

use crate::RowKey;

/// Key-at-a-time iterator over a [`crate::RowKeySet`].
///
/// Supports iteration from both ends; the two cursors never cross because
/// `remaining` bounds the total number of yielded keys.
#[derive(Clone, Debug)]
pub struct Keys<'a> {
    runs: &'a [(RowKey, RowKey)],
    /// (run index, next key to yield from the front)
    front: (usize, RowKey),
    /// (run index, one past the next key to yield from the back)
    back: (usize, RowKey),
    remaining: u64,
}

impl<'a> Keys<'a> {
    pub(crate) fn new(runs: &'a [(RowKey, RowKey)], len: u64) -> Self {
        let front = runs.first().map(|&(begin, _)| (0, begin)).unwrap_or((0, 0));
        let back = runs
            .last()
            .map(|&(_, end)| (runs.len() - 1, end))
            .unwrap_or((0, 0));
        Self {
            runs,
            front,
            back,
            remaining: len,
        }
    }
}

impl Iterator for Keys<'_> {
    type Item = RowKey;

    fn next(&mut self) -> Option<RowKey> {
        if self.remaining == 0 {
            return None;
        }
        let (run, key) = self.front;
        let (_, end) = self.runs[run];
        if key + 1 == end {
            let next_begin = self.runs.get(run + 1).map_or(0, |&(begin, _)| begin);
            self.front = (run + 1, next_begin);
        } else {
            self.front.1 = key + 1;
        }
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl DoubleEndedIterator for Keys<'_> {
    fn next_back(&mut self) -> Option<RowKey> {
        if self.remaining == 0 {
            return None;
        }
        let (run, end) = self.back;
        let key = end - 1;
        if key == self.runs[run].0 {
            if run > 0 {
                self.back = (run - 1, self.runs[run - 1].1);
            }
        } else {
            self.back.1 = key;
        }
        self.remaining -= 1;
        Some(key)
    }
}

impl ExactSizeIterator for Keys<'_> {}

impl FusedIterator for Keys<'_> {}

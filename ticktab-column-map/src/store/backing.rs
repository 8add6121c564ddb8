//! Element containers behind a column: plain `Vec` or persistent `im::Vector`.

use crate::types::StorageBacking;

/// Values of one column in index-space order.
///
/// Callers check bounds before calling the positional methods; the methods
/// themselves assume valid positions.
#[derive(Debug, Clone)]
pub(crate) enum Backing<T: Clone> {
    Array(Vec<Option<T>>),
    Persistent(im::Vector<Option<T>>),
}

impl<T: Clone> Backing<T> {
    pub(crate) fn from_vec(kind: StorageBacking, values: Vec<Option<T>>) -> Self {
        match kind {
            StorageBacking::Array => Backing::Array(values),
            StorageBacking::Persistent => Backing::Persistent(values.into_iter().collect()),
        }
    }

    /// `len` nulls.
    pub(crate) fn nulls(kind: StorageBacking, len: usize) -> Self {
        Self::from_vec(kind, vec![None; len])
    }

    pub(crate) fn kind(&self) -> StorageBacking {
        match self {
            Backing::Array(_) => StorageBacking::Array,
            Backing::Persistent(_) => StorageBacking::Persistent,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Backing::Array(v) => v.len(),
            Backing::Persistent(v) => v.len(),
        }
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<T> {
        match self {
            Backing::Array(v) => v[index].clone(),
            Backing::Persistent(v) => v[index].clone(),
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, value: Option<T>) {
        match self {
            Backing::Array(v) => v[index] = value,
            Backing::Persistent(v) => {
                v.set(index, value);
            }
        }
    }

    /// Pad with nulls until the container holds `len` elements.
    pub(crate) fn grow_to(&mut self, len: usize) {
        match self {
            Backing::Array(v) => {
                if v.len() < len {
                    v.resize(len, None);
                }
            }
            Backing::Persistent(v) => {
                while v.len() < len {
                    v.push_back(None);
                }
            }
        }
    }

    /// The first `n` elements, leaving `self` untouched.
    pub(crate) fn take(&self, n: usize) -> Self {
        match self {
            Backing::Array(v) => Backing::Array(v[..n].to_vec()),
            Backing::Persistent(v) => {
                let mut head = v.clone();
                head.truncate(n);
                Backing::Persistent(head)
            }
        }
    }

    /// Remove the first `n` elements.
    pub(crate) fn drop_front(&mut self, n: usize) {
        match self {
            Backing::Array(v) => {
                v.drain(..n);
            }
            Backing::Persistent(v) => {
                let tail = v.split_off(n);
                *v = tail;
            }
        }
    }

    /// Concatenate `other` onto the end, converting representation when the
    /// two backings differ. `self` keeps its own backing.
    pub(crate) fn append(&mut self, other: Self) {
        match (self, other) {
            (Backing::Array(lhs), Backing::Array(rhs)) => lhs.extend(rhs),
            (Backing::Array(lhs), Backing::Persistent(rhs)) => lhs.extend(rhs),
            (Backing::Persistent(lhs), Backing::Persistent(rhs)) => lhs.append(rhs),
            (Backing::Persistent(lhs), Backing::Array(rhs)) => {
                lhs.append(rhs.into_iter().collect())
            }
        }
    }

    /// Copy `src[src_begin..src_end]` into `self` starting at `dest_begin`.
    pub(crate) fn copy_run_from(
        &mut self,
        dest_begin: usize,
        src: &Self,
        src_begin: usize,
        src_end: usize,
    ) {
        let width = src_end - src_begin;
        match (self, src) {
            (Backing::Array(dest), Backing::Array(src)) => {
                dest[dest_begin..dest_begin + width].clone_from_slice(&src[src_begin..src_end]);
            }
            (dest, src) => {
                for offset in 0..width {
                    dest.set(dest_begin + offset, src.get(src_begin + offset));
                }
            }
        }
    }

    pub(crate) fn iter(&self) -> BackingIter<'_, T> {
        match self {
            Backing::Array(v) => BackingIter::Array(v.iter()),
            Backing::Persistent(v) => BackingIter::Persistent(v.iter()),
        }
    }

    #[cfg(test)]
    pub(crate) fn to_vec(&self) -> Vec<Option<T>> {
        match self {
            Backing::Array(v) => v.clone(),
            Backing::Persistent(v) => v.iter().cloned().collect(),
        }
    }

    pub(crate) fn into_kind(self, kind: StorageBacking) -> Self {
        match (self, kind) {
            (Backing::Persistent(v), StorageBacking::Array) => {
                Backing::Array(v.into_iter().collect())
            }
            (Backing::Array(v), StorageBacking::Persistent) => {
                Backing::Persistent(v.into_iter().collect())
            }
            (same, _) => same,
        }
    }
}

pub(crate) enum BackingIter<'a, T: Clone> {
    Array(std::slice::Iter<'a, Option<T>>),
    Persistent(im::vector::Iter<'a, Option<T>>),
}

impl<'a, T: Clone> Iterator for BackingIter<'a, T> {
    type Item = &'a Option<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            BackingIter::Array(it) => it.next(),
            BackingIter::Persistent(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            BackingIter::Array(it) => it.size_hint(),
            BackingIter::Persistent(it) => it.size_hint(),
        }
    }
}

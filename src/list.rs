//! Growable reference list.
//!
//! An index-addressable sequence with a few inline slots before it spills to the
//! heap. Union branches and multi-node results are both stored in one.
//!
//! Growth never silently truncates: [`RefList::push`] and [`RefList::prepend`]
//! reserve fallibly and report [`AllocError`] so the caller can abort the
//! evaluation that needed the slot.

use smallvec::SmallVec;
use thiserror::Error;

/// Inline capacity before the list moves to the heap.
const INLINE: usize = 4;

/// Raised when the list cannot grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("out of memory growing list to {requested} elements")]
pub struct AllocError {
    pub requested: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefList<T> {
    items: SmallVec<[T; INLINE]>,
}

impl<T> Default for RefList<T> {
    fn default() -> Self {
        RefList {
            items: SmallVec::new(),
        }
    }
}

impl<T> RefList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RefList {
            items: SmallVec::with_capacity(capacity),
        }
    }

    fn reserve_one(&mut self) -> Result<(), AllocError> {
        let requested = self.items.len() + 1;
        self.items
            .try_reserve(1)
            .map_err(|_| AllocError { requested })
    }

    /// Appends at the end.
    pub fn push(&mut self, item: T) -> Result<(), AllocError> {
        self.reserve_one()?;
        self.items.push(item);
        Ok(())
    }

    /// Inserts at the front, shifting everything else back by one.
    pub fn prepend(&mut self, item: T) -> Result<(), AllocError> {
        self.reserve_one()?;
        self.items.insert(0, item);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items.into_vec()
    }
}

impl<T> std::ops::Index<usize> for RefList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> FromIterator<T> for RefList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        RefList {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for RefList<T> {
    type Item = T;
    type IntoIter = smallvec::IntoIter<[T; INLINE]>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a RefList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

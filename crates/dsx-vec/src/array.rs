//! The [`DynArray`] container.
//!
//! A `DynArray` owns exactly one `RawBuffer`. Growth, shrink, and clear
//! are the only operations that allocate; each one builds the replacement
//! buffer first, moves the live prefix into it, and only then drops the old
//! buffer. A failed allocation therefore leaves the array exactly as it was.

use std::fmt;
use std::ops::{Index, IndexMut};

use tracing::trace;

use crate::config::{self, DEFAULT_CAPACITY};
use crate::error::DynArrayError;
use crate::raw::RawBuffer;

/// A contiguous growable array with explicit capacity management.
///
/// `DEFAULT_CAP` is the capacity used by [`new`](Self::new), the floor for
/// [`from_slice`](Self::from_slice) and doubling growth, and the capacity
/// [`clear`](Self::clear) resets to. Two arrays can only be
/// [`swap`](Self::swap)ped when they agree on it.
///
/// Elements are moved in and out: `push` takes ownership, `pop` and
/// `erase_at` hand it back.
///
/// ```
/// use dsx_vec::DynArray;
///
/// let mut arr: DynArray<i32> = DynArray::new();
/// arr.push(10)?;
/// arr.push(20)?;
/// arr.insert_at(15, 1)?;
/// assert_eq!(arr.as_slice(), &[10, 15, 20]);
/// assert_eq!(arr.erase_at(0), Some(10));
/// assert_eq!(*arr.at(1)?, 20);
/// # Ok::<(), dsx_vec::DynArrayError>(())
/// ```
pub struct DynArray<T, const DEFAULT_CAP: usize = DEFAULT_CAPACITY> {
    buf: RawBuffer<T>,
}

impl<T, const DEFAULT_CAP: usize> DynArray<T, DEFAULT_CAP> {
    /// Create an empty array with `DEFAULT_CAP` slots.
    ///
    /// Aborts if the allocator cannot supply the default buffer.
    pub fn new() -> Self {
        Self {
            buf: RawBuffer::allocate(DEFAULT_CAP),
        }
    }

    /// Create an empty array with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, DynArrayError> {
        Ok(Self {
            buf: RawBuffer::try_allocate(capacity, "with_capacity")?,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_mut_slice()
    }

    /// Iterate over the live elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// The first element.
    ///
    /// Fails with [`DynArrayError::OutOfRange`] on an empty array.
    pub fn front(&self) -> Result<&T, DynArrayError> {
        self.as_slice().first().ok_or(DynArrayError::OutOfRange {
            op: "front",
            index: 0,
            len: 0,
        })
    }

    /// The last element.
    ///
    /// Fails with [`DynArrayError::OutOfRange`] on an empty array.
    pub fn back(&self) -> Result<&T, DynArrayError> {
        self.as_slice().last().ok_or(DynArrayError::OutOfRange {
            op: "back",
            index: 0,
            len: 0,
        })
    }

    /// Element at `index`.
    ///
    /// Negative indices are rejected with [`DynArrayError::NegativeIndex`]
    /// rather than counted from the end. Indices at or past `len()` fail
    /// with [`DynArrayError::OutOfRange`].
    pub fn at(&self, index: isize) -> Result<&T, DynArrayError> {
        let index = self.resolve(index, "at")?;
        Ok(&self.as_slice()[index])
    }

    /// Mutable element at `index`. Same index rules as [`at`](Self::at).
    pub fn at_mut(&mut self, index: isize) -> Result<&mut T, DynArrayError> {
        let index = self.resolve(index, "at_mut")?;
        Ok(&mut self.as_mut_slice()[index])
    }

    fn resolve(&self, index: isize, op: &'static str) -> Result<usize, DynArrayError> {
        let resolved =
            usize::try_from(index).map_err(|_| DynArrayError::NegativeIndex { op, index })?;
        if resolved >= self.len() {
            return Err(DynArrayError::OutOfRange {
                op,
                index: resolved,
                len: self.len(),
            });
        }
        Ok(resolved)
    }

    /// Ensure room for at least `capacity` slots.
    ///
    /// Allocates exactly `capacity` slots when growing. Never shrinks.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), DynArrayError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        self.reallocate(capacity, "reserve")
    }

    /// Drop slack capacity so that `capacity() == len()`.
    ///
    /// An empty array keeps its buffer.
    pub fn shrink(&mut self) -> Result<(), DynArrayError> {
        if self.is_empty() || self.capacity() == self.len() {
            return Ok(());
        }
        let len = self.len();
        self.reallocate(len, "shrink")
    }

    /// Drop every element and replace the buffer with a fresh one of
    /// `DEFAULT_CAP` slots.
    ///
    /// On allocation failure the contents are left in place.
    pub fn clear(&mut self) -> Result<(), DynArrayError> {
        let fresh = RawBuffer::try_allocate(DEFAULT_CAP, "clear")?;
        let old = std::mem::replace(&mut self.buf, fresh);
        trace!(
            op = "clear",
            dropped = old.len(),
            old_capacity = old.capacity(),
            new_capacity = DEFAULT_CAP,
            "buffer replaced"
        );
        drop(old);
        Ok(())
    }

    /// Shorten the array to `len` elements, dropping the rest.
    ///
    /// No-op if `len >= self.len()`. Capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Resize to `new_len`, filling new slots with values from `fill`.
    ///
    /// Shrinking truncates without reallocating. Growing past the capacity
    /// reserves exactly `new_len` slots first.
    pub fn resize_with<F>(&mut self, new_len: usize, mut fill: F) -> Result<(), DynArrayError>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len() {
            self.truncate(new_len);
            return Ok(());
        }
        if new_len > self.capacity() {
            self.reallocate(new_len, "resize")?;
        }
        while self.len() < new_len {
            self.buf.push_within_capacity(fill());
        }
        Ok(())
    }

    /// Append `value`.
    ///
    /// Grows (doubling, floored at `DEFAULT_CAP`) once `len() + 1` reaches
    /// the capacity. Amortised O(1). On allocation failure `value` is
    /// dropped and the array is unchanged.
    pub fn push(&mut self, value: T) -> Result<(), DynArrayError> {
        if config::push_needs_growth(self.len(), self.capacity()) {
            let grown = self.grown_capacity("push")?;
            self.reallocate(grown, "push")?;
        }
        self.buf.push_within_capacity(value);
        Ok(())
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        self.buf.pop()
    }

    /// Insert `value` at `index`, shifting later elements right.
    ///
    /// `index >= len()` appends exactly like [`push`](Self::push). A full
    /// buffer is replaced by a doubled one and the elements are moved
    /// straight into their shifted positions.
    pub fn insert_at(&mut self, value: T, index: usize) -> Result<(), DynArrayError> {
        if index >= self.len() {
            return self.push(value);
        }
        if self.len() < self.capacity() {
            self.buf.insert_within_capacity(index, value);
            return Ok(());
        }
        let grown = self.grown_capacity("insert_at")?;
        let mut replacement = RawBuffer::try_allocate(grown, "insert_at")?;
        let old_capacity = self.capacity();
        self.buf.relocate_with_insert(&mut replacement, index, value);
        self.buf = replacement;
        trace!(
            op = "insert_at",
            old_capacity,
            new_capacity = grown,
            len = self.len(),
            "buffer replaced"
        );
        Ok(())
    }

    /// Remove and return the element at `index`, shifting later elements
    /// left. `None` if `index >= len()`.
    pub fn erase_at(&mut self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        Some(self.buf.remove(index))
    }

    /// Exchange contents with `other` in O(1). No element is moved.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.buf, &mut other.buf);
    }

    fn grown_capacity(&self, op: &'static str) -> Result<usize, DynArrayError> {
        config::grown_capacity(self.capacity(), DEFAULT_CAP).ok_or(
            DynArrayError::CapacityOverflow {
                op,
                current: self.capacity(),
            },
        )
    }

    /// Replace the buffer with one of exactly `capacity` slots holding the
    /// same elements. `capacity` must be at least `len()`.
    fn reallocate(&mut self, capacity: usize, op: &'static str) -> Result<(), DynArrayError> {
        debug_assert!(capacity >= self.len());
        let mut replacement = RawBuffer::try_allocate(capacity, op)?;
        let old_capacity = self.capacity();
        self.buf.relocate_into(&mut replacement);
        self.buf = replacement;
        trace!(
            op,
            old_capacity,
            new_capacity = capacity,
            len = self.len(),
            "buffer replaced"
        );
        Ok(())
    }
}

impl<T: Clone, const DEFAULT_CAP: usize> DynArray<T, DEFAULT_CAP> {
    /// Create an array holding a copy of `items`.
    ///
    /// Capacity is `DEFAULT_CAP`, or `items.len()` if that is larger.
    pub fn from_slice(items: &[T]) -> Result<Self, DynArrayError> {
        let mut buf = RawBuffer::try_allocate(items.len().max(DEFAULT_CAP), "from_slice")?;
        for item in items {
            buf.push_within_capacity(item.clone());
        }
        Ok(Self { buf })
    }
}

impl<T: Default, const DEFAULT_CAP: usize> DynArray<T, DEFAULT_CAP> {
    /// Resize to `new_len`, filling new slots with `T::default()`.
    ///
    /// See [`resize_with`](Self::resize_with).
    pub fn resize(&mut self, new_len: usize) -> Result<(), DynArrayError> {
        self.resize_with(new_len, T::default)
    }
}

impl<T, const DEFAULT_CAP: usize> Default for DynArray<T, DEFAULT_CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const DEFAULT_CAP: usize> TryFrom<Vec<T>> for DynArray<T, DEFAULT_CAP> {
    type Error = DynArrayError;

    /// Move the elements of `items` into a new array.
    fn try_from(items: Vec<T>) -> Result<Self, Self::Error> {
        let mut buf = RawBuffer::try_allocate(items.len().max(DEFAULT_CAP), "try_from")?;
        for item in items {
            buf.push_within_capacity(item);
        }
        Ok(Self { buf })
    }
}

impl<T, const DEFAULT_CAP: usize> FromIterator<T> for DynArray<T, DEFAULT_CAP> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        let mut buf = RawBuffer::allocate(items.len().max(DEFAULT_CAP));
        for item in items {
            buf.push_within_capacity(item);
        }
        Self { buf }
    }
}

impl<T: Clone, const DEFAULT_CAP: usize> Clone for DynArray<T, DEFAULT_CAP> {
    /// The clone has capacity `DEFAULT_CAP`, or `len()` if that is larger.
    fn clone(&self) -> Self {
        let mut buf = RawBuffer::allocate(self.len().max(DEFAULT_CAP));
        for item in self.iter() {
            buf.push_within_capacity(item.clone());
        }
        Self { buf }
    }
}

impl<T, const DEFAULT_CAP: usize> Index<usize> for DynArray<T, DEFAULT_CAP> {
    type Output = T;

    /// # Panics
    ///
    /// Panics with the [`DynArrayError::OutOfRange`] message if `index`
    /// is at or past `len()`.
    fn index(&self, index: usize) -> &T {
        match self.as_slice().get(index) {
            Some(item) => item,
            None => panic!(
                "{}",
                DynArrayError::OutOfRange {
                    op: "index",
                    index,
                    len: self.len(),
                }
            ),
        }
    }
}

impl<T, const DEFAULT_CAP: usize> IndexMut<usize> for DynArray<T, DEFAULT_CAP> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.as_mut_slice().get_mut(index) {
            Some(item) => item,
            None => panic!(
                "{}",
                DynArrayError::OutOfRange {
                    op: "index_mut",
                    index,
                    len,
                }
            ),
        }
    }
}

impl<'a, T, const DEFAULT_CAP: usize> IntoIterator for &'a DynArray<T, DEFAULT_CAP> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq, const DEFAULT_CAP: usize> PartialEq for DynArray<T, DEFAULT_CAP> {
    /// Arrays compare by contents; capacity is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, const DEFAULT_CAP: usize> Eq for DynArray<T, DEFAULT_CAP> {}

impl<T: fmt::Debug, const DEFAULT_CAP: usize> fmt::Debug for DynArray<T, DEFAULT_CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arr(items: &[i32]) -> DynArray<i32> {
        DynArray::from_slice(items).unwrap()
    }

    #[test]
    fn default_construction() {
        let a: DynArray<i32> = DynArray::new();
        assert_eq!(a.len(), 0);
        assert_eq!(a.capacity(), 5);
        assert!(a.is_empty());
    }

    #[test]
    fn sequence_construction_uses_default_floor() {
        let a = arr(&[1, 2, 3]);
        assert_eq!(a.len(), 3);
        assert_eq!(a.capacity(), 5);
        assert_eq!(*a.at(0).unwrap(), 1);
        assert_eq!(*a.at(2).unwrap(), 3);
    }

    #[test]
    fn long_sequence_construction_fits_all_elements() {
        let items: Vec<i32> = (0..12).collect();
        let a = arr(&items);
        assert_eq!(a.len(), 12);
        assert_eq!(a.capacity(), 12);
        assert_eq!(a.as_slice(), items.as_slice());
    }

    #[test]
    fn explicit_capacity_construction() {
        let a = DynArray::<i32>::with_capacity(4).unwrap();
        assert_eq!(a.len(), 0);
        assert_eq!(a.capacity(), 4);
    }

    #[test]
    fn custom_default_capacity_is_used_everywhere() {
        let mut a: DynArray<u8, 2> = DynArray::new();
        assert_eq!(a.capacity(), 2);
        a.push(1).unwrap();
        assert_eq!(a.capacity(), 2);
        a.push(2).unwrap();
        assert_eq!(a.capacity(), 4);
        a.clear().unwrap();
        assert_eq!(a.capacity(), 2);
    }

    #[test]
    fn front_and_back() {
        let a = arr(&[4, 5, 6]);
        assert_eq!(a.front(), Ok(&4));
        assert_eq!(a.back(), Ok(&6));
    }

    #[test]
    fn front_and_back_on_empty_fail() {
        let a: DynArray<i32> = DynArray::new();
        assert!(matches!(
            a.front(),
            Err(DynArrayError::OutOfRange { op: "front", .. })
        ));
        assert!(matches!(
            a.back(),
            Err(DynArrayError::OutOfRange { op: "back", .. })
        ));
    }

    #[test]
    fn at_rejects_negative_index() {
        let a = arr(&[1, 2, 3]);
        assert_eq!(
            a.at(-1),
            Err(DynArrayError::NegativeIndex { op: "at", index: -1 })
        );
        let empty: DynArray<i32> = DynArray::new();
        assert!(matches!(
            empty.at(-1),
            Err(DynArrayError::NegativeIndex { .. })
        ));
    }

    #[test]
    fn at_rejects_index_past_len() {
        let a = arr(&[1, 2, 3]);
        assert_eq!(
            a.at(3),
            Err(DynArrayError::OutOfRange {
                op: "at",
                index: 3,
                len: 3
            })
        );
    }

    #[test]
    fn at_mut_writes_through() {
        let mut a = arr(&[1, 2, 3]);
        *a.at_mut(1).unwrap() = 20;
        assert_eq!(a.as_slice(), &[1, 20, 3]);
        assert!(matches!(
            a.at_mut(-2),
            Err(DynArrayError::NegativeIndex { op: "at_mut", .. })
        ));
    }

    #[test]
    fn index_operator_reads_and_writes() {
        let mut a = arr(&[1, 2, 3]);
        a[0] = 7;
        assert_eq!(a[0], 7);
        assert_eq!(a[2], 3);
    }

    #[test]
    #[should_panic(expected = "index 5 is out of bounds of array with len 3")]
    fn index_operator_panics_past_len() {
        let a = arr(&[1, 2, 3]);
        let _value = a[5];
    }

    #[test]
    fn push_and_pop() {
        let mut a: DynArray<i32> = DynArray::new();
        a.push(10).unwrap();
        a.push(20).unwrap();
        a.push(30).unwrap();
        assert_eq!(a.as_slice(), &[10, 20, 30]);
        assert_eq!(a.pop(), Some(30));
        assert_eq!(a.len(), 2);
        assert_eq!(a.as_slice(), &[10, 20]);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut a: DynArray<i32> = DynArray::new();
        assert_eq!(a.pop(), None);
        assert_eq!(a.len(), 0);
    }

    #[test]
    fn push_grows_before_buffer_is_full() {
        let mut a: DynArray<i32> = DynArray::new();
        for i in 0..4 {
            a.push(i).unwrap();
        }
        assert_eq!(a.capacity(), 5);
        a.push(4).unwrap();
        assert_eq!(a.capacity(), 10);
        assert_eq!(a.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn push_into_zero_capacity_grows_to_default() {
        let mut a = DynArray::<i32>::with_capacity(0).unwrap();
        a.push(1).unwrap();
        assert_eq!(a.capacity(), 5);
        assert_eq!(a.as_slice(), &[1]);
    }

    #[test]
    fn reserve_grows_exactly_and_never_shrinks() {
        let mut a = arr(&[1, 2]);
        a.reserve(3).unwrap();
        assert_eq!(a.capacity(), 5);
        a.reserve(32).unwrap();
        assert_eq!(a.capacity(), 32);
        assert_eq!(a.as_slice(), &[1, 2]);
    }

    #[test]
    fn reserve_failure_leaves_array_untouched() {
        let mut a = arr(&[1, 2, 3]);
        let err = a.reserve(usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            DynArrayError::AllocationFailed { op: "reserve", .. }
        ));
        assert_eq!(a.capacity(), 5);
        assert_eq!(a.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn shrink_matches_len() {
        let mut a = arr(&[1, 2, 3]);
        a.shrink().unwrap();
        assert_eq!(a.capacity(), 3);
        a.shrink().unwrap();
        assert_eq!(a.capacity(), 3);
        assert_eq!(a.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn shrink_on_empty_is_noop() {
        let mut a = DynArray::<i32>::with_capacity(9).unwrap();
        a.shrink().unwrap();
        assert_eq!(a.capacity(), 9);
    }

    #[test]
    fn clear_resets_to_default_capacity() {
        let mut a = arr(&[1, 2, 3]);
        a.clear().unwrap();
        assert_eq!(a.len(), 0);
        assert_eq!(a.capacity(), 5);

        let mut big = DynArray::<i32>::with_capacity(64).unwrap();
        big.push(1).unwrap();
        big.clear().unwrap();
        assert_eq!(big.capacity(), 5);
    }

    #[test]
    fn resize_truncates() {
        let mut a = arr(&[1, 2, 3]);
        a.resize(2).unwrap();
        assert_eq!(a.as_slice(), &[1, 2]);
        assert_eq!(a.capacity(), 5);
    }

    #[test]
    fn resize_within_capacity_fills_defaults() {
        let mut a = arr(&[1, 2]);
        a.resize(4).unwrap();
        assert_eq!(a.as_slice(), &[1, 2, 0, 0]);
        assert_eq!(a.capacity(), 5);
    }

    #[test]
    fn resize_past_capacity_reserves_exactly() {
        let mut a = arr(&[1, 2]);
        a.resize(8).unwrap();
        assert_eq!(a.len(), 8);
        assert_eq!(a.capacity(), 8);
        assert_eq!(a.as_slice(), &[1, 2, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn resize_with_uses_fill() {
        let mut a: DynArray<String> = DynArray::new();
        a.resize_with(2, || "x".to_owned()).unwrap();
        assert_eq!(a.as_slice(), &["x", "x"]);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut a = arr(&[10, 20, 30]);
        a.insert_at(25, 1).unwrap();
        assert_eq!(a.as_slice(), &[10, 25, 20, 30]);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn insert_past_end_appends() {
        let mut a = arr(&[1, 2, 3]);
        a.insert_at(0, 0).unwrap();
        a.insert_at(4, 4).unwrap();
        a.insert_at(99, 100).unwrap();
        assert_eq!(a.as_slice(), &[0, 1, 2, 3, 4, 99]);
    }

    #[test]
    fn insert_into_full_buffer_grows_in_one_pass() {
        let mut a = DynArray::<i32>::with_capacity(3).unwrap();
        for v in [1, 2, 3] {
            a.insert_at(v, 0).unwrap();
        }
        assert_eq!(a.as_slice(), &[3, 2, 1]);
        assert_eq!(a.capacity(), 3);
        a.insert_at(4, 1).unwrap();
        assert_eq!(a.capacity(), 6);
        assert_eq!(a.as_slice(), &[3, 4, 2, 1]);
    }

    #[test]
    fn erase_from_front() {
        let mut a = arr(&[10, 20, 30]);
        assert_eq!(a.erase_at(0), Some(10));
        assert_eq!(a.as_slice(), &[20, 30]);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn erase_past_end_is_none() {
        let mut a = arr(&[1, 2, 3]);
        assert_eq!(a.erase_at(3), None);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn swap_exchanges_everything() {
        let mut a = arr(&[1, 2, 3]);
        let mut b = arr(&[4, 5, 6, 3]);
        b.reserve(16).unwrap();
        a.swap(&mut b);
        assert_eq!(a.as_slice(), &[4, 5, 6, 3]);
        assert_eq!(a.capacity(), 16);
        assert_eq!(b.as_slice(), &[1, 2, 3]);
        assert_eq!(b.capacity(), 5);
        a.swap(&mut b);
        assert_eq!(a.as_slice(), &[1, 2, 3]);
        assert_eq!(b.as_slice(), &[4, 5, 6, 3]);
    }

    #[test]
    fn try_from_vec_moves_elements() {
        let a = DynArray::<String>::try_from(vec!["a".to_owned(), "b".to_owned()]).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a.capacity(), 5);
        assert_eq!(a.back().unwrap(), "b");
    }

    #[test]
    fn collect_and_clone() {
        let a: DynArray<i32> = (1..=7).collect();
        assert_eq!(a.capacity(), 7);
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(format!("{b:?}"), "[1, 2, 3, 4, 5, 6, 7]");
    }

    #[test]
    fn clone_capacity_follows_len_not_source_capacity() {
        let mut shrunk = arr(&[1, 2]);
        shrunk.shrink().unwrap();
        assert_eq!(shrunk.capacity(), 2);
        assert_eq!(shrunk.clone().capacity(), 5);

        let mut reserved = arr(&[1]);
        reserved.reserve(64).unwrap();
        let copy = reserved.clone();
        assert_eq!(copy.capacity(), 5);
        assert_eq!(copy.as_slice(), &[1]);

        let long: DynArray<i32> = (0..9).collect();
        assert_eq!(long.clone().capacity(), 9);
    }

    #[test]
    fn zero_default_capacity_still_grows() {
        let mut a: DynArray<i32, 0> = DynArray::new();
        assert_eq!(a.capacity(), 0);
        a.push(1).unwrap();
        assert_eq!(a.capacity(), 1);
        a.push(2).unwrap();
        a.insert_at(3, 5).unwrap();
        assert_eq!(a.as_slice(), &[1, 2, 3]);
        assert!(a.capacity() >= a.len());

        a.clear().unwrap();
        assert_eq!(a.capacity(), 0);
        a.insert_at(7, 0).unwrap();
        assert_eq!(a.as_slice(), &[7]);

        let mut b = DynArray::<i32, 0>::with_capacity(0).unwrap();
        b.push(9).unwrap();
        assert_eq!(b.as_slice(), &[9]);
    }

    /// A default capacity too large for any allocator: every growth fails.
    const UNALLOCATABLE: usize = usize::MAX / 8;

    #[test]
    fn push_allocation_failure_leaves_array_untouched() {
        let mut a = DynArray::<u64, UNALLOCATABLE>::with_capacity(2).unwrap();
        a.push(1).unwrap();
        let err = a.push(2).unwrap_err();
        assert!(matches!(
            err,
            DynArrayError::AllocationFailed { op: "push", .. }
        ));
        assert_eq!(a.as_slice(), &[1]);
        assert_eq!(a.capacity(), 2);
    }

    #[test]
    fn insert_allocation_failure_leaves_array_untouched() {
        let mut a = DynArray::<u64, UNALLOCATABLE>::with_capacity(2).unwrap();
        a.push(1).unwrap();
        a.insert_at(0, 0).unwrap();
        assert_eq!(a.len(), a.capacity());
        let err = a.insert_at(9, 1).unwrap_err();
        assert!(matches!(
            err,
            DynArrayError::AllocationFailed { op: "insert_at", .. }
        ));
        assert_eq!(a.as_slice(), &[0, 1]);
        assert_eq!(a.capacity(), 2);
    }

    #[test]
    fn clear_allocation_failure_keeps_contents() {
        let mut a = DynArray::<u64, UNALLOCATABLE>::with_capacity(4).unwrap();
        a.resize(3).unwrap();
        let err = a.clear().unwrap_err();
        assert_eq!(
            err,
            DynArrayError::AllocationFailed {
                op: "clear",
                requested: UNALLOCATABLE
            }
        );
        assert_eq!(a.as_slice(), &[0, 0, 0]);
        assert_eq!(a.capacity(), 4);
    }

    #[test]
    fn resize_allocation_failure_keeps_contents() {
        let mut a = arr(&[1, 2]);
        let err = a.resize(usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            DynArrayError::AllocationFailed { op: "resize", .. }
        ));
        assert_eq!(a.as_slice(), &[1, 2]);
        assert_eq!(a.capacity(), 5);
    }

    fn units(capacity: usize, len: usize) -> DynArray<()> {
        DynArray {
            buf: RawBuffer::units(capacity, len),
        }
    }

    #[test]
    fn push_capacity_overflow_leaves_array_untouched() {
        let cap = usize::MAX / 2 + 1;
        let mut a = units(cap, cap - 1);
        assert_eq!(
            a.push(()),
            Err(DynArrayError::CapacityOverflow {
                op: "push",
                current: cap
            })
        );
        assert_eq!(a.len(), cap - 1);
        assert_eq!(a.capacity(), cap);
    }

    #[test]
    fn insert_capacity_overflow_leaves_array_untouched() {
        let cap = usize::MAX / 2 + 1;
        let mut a = units(cap, cap);
        assert_eq!(
            a.insert_at((), 0),
            Err(DynArrayError::CapacityOverflow {
                op: "insert_at",
                current: cap
            })
        );
        assert_eq!(a.len(), cap);
        assert_eq!(a.capacity(), cap);
    }

    #[test]
    fn shrink_of_zero_sized_elements_keeps_len() {
        let mut a = units(usize::MAX, 3);
        a.shrink().unwrap();
        assert_eq!(a.capacity(), 3);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn iterates_in_order() {
        let a = arr(&[3, 1, 2]);
        let seen: Vec<i32> = (&a).into_iter().copied().collect();
        assert_eq!(seen, [3, 1, 2]);
        assert_eq!(a.iter().sum::<i32>(), 6);
    }
}

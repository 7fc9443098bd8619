//! Owned slot buffer: the only place in the crate that touches
//! uninitialised memory.
//!
//! A [`RawBuffer`] is a boxed slice of `MaybeUninit<T>` plus the length of
//! its initialised prefix. Every operation here keeps the invariant that
//! slots `[0, len)` are initialised and slots `[len, capacity)` are not, so
//! the safe methods can be called in any order without UB. Each `unsafe`
//! block carries a `// SAFETY:` comment against that invariant.

#![allow(unsafe_code)]

use std::mem::MaybeUninit;
use std::ptr;

use crate::error::DynArrayError;

pub(crate) struct RawBuffer<T> {
    slots: Box<[MaybeUninit<T>]>,
    /// Number of initialised slots at the front of `slots`.
    len: usize,
}

impl<T> RawBuffer<T> {
    /// Allocate a buffer of exactly `capacity` uninitialised slots.
    ///
    /// Allocation failure is reported, not aborted on.
    pub(crate) fn try_allocate(capacity: usize, op: &'static str) -> Result<Self, DynArrayError> {
        let mut slots: Vec<MaybeUninit<T>> = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| DynArrayError::AllocationFailed {
                op,
                requested: capacity,
            })?;
        Ok(Self::from_reserved(slots, capacity))
    }

    /// Allocate a buffer of exactly `capacity` slots, aborting on failure
    /// like the standard collections do.
    pub(crate) fn allocate(capacity: usize) -> Self {
        Self::from_reserved(Vec::with_capacity(capacity), capacity)
    }

    fn from_reserved(mut slots: Vec<MaybeUninit<T>>, capacity: usize) -> Self {
        debug_assert!(slots.capacity() >= capacity);
        // SAFETY: `capacity` slots are reserved, and `MaybeUninit<T>` needs
        // no initialisation.
        unsafe { slots.set_len(capacity) };
        Self {
            slots: slots.into_boxed_slice(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are initialised, and `MaybeUninit<T>` has
        // the same layout as `T`.
        unsafe { std::slice::from_raw_parts(self.slots.as_ptr().cast::<T>(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; the unique borrow of `self` covers the
        // returned slice.
        unsafe { std::slice::from_raw_parts_mut(self.slots.as_mut_ptr().cast::<T>(), self.len) }
    }

    /// Write `value` into the first free slot.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is full. Callers grow before writing.
    pub(crate) fn push_within_capacity(&mut self, value: T) {
        assert!(
            self.len < self.capacity(),
            "push_within_capacity on a full buffer"
        );
        self.slots[self.len].write(value);
        self.len += 1;
    }

    /// Move the last live element out, if any.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was initialised (it was inside the live prefix
        // before the decrement) and is now outside it, so it is read once.
        Some(unsafe { self.slots[self.len].assume_init_read() })
    }

    /// Shift `[index, len)` right by one slot and write `value` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` or the buffer is full.
    pub(crate) fn insert_within_capacity(&mut self, index: usize, value: T) {
        assert!(index <= self.len, "insert index past the live prefix");
        assert!(
            self.len < self.capacity(),
            "insert_within_capacity on a full buffer"
        );
        let base = self.slots.as_mut_ptr().cast::<T>();
        // SAFETY: `index <= len < capacity`, so both the source range
        // [index, len) and the destination [index + 1, len + 1) lie inside
        // the allocation. `ptr::copy` handles the overlap. Slot `index` is
        // then logically uninitialised and is overwritten without a drop.
        unsafe {
            let at = base.add(index);
            ptr::copy(at, at.add(1), self.len - index);
            ptr::write(at, value);
        }
        self.len += 1;
    }

    /// Move the element at `index` out and shift `[index + 1, len)` left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "remove index outside the live prefix");
        let base = self.slots.as_mut_ptr().cast::<T>();
        // SAFETY: `index < len`, so slot `index` is initialised and is read
        // exactly once. The tail [index + 1, len) is initialised and is
        // moved down by one; the stale bits left in slot `len - 1` fall
        // outside the live prefix after the decrement.
        unsafe {
            let at = base.add(index);
            let value = ptr::read(at);
            ptr::copy(at.add(1), at, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Drop every live element past `new_len`. No-op if `new_len >= len`.
    pub(crate) fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail_len = self.len - new_len;
        // Shorten first: if a destructor panics the remaining tail leaks
        // instead of being dropped twice.
        self.len = new_len;
        // SAFETY: [new_len, new_len + tail_len) was the initialised tail of
        // the live prefix and is no longer reachable through `len`.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(
                self.slots.as_mut_ptr().cast::<T>().add(new_len),
                tail_len,
            );
            ptr::drop_in_place(tail);
        }
    }

    /// Move every live element into the empty buffer `dst`, leaving `self`
    /// empty.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is not empty or cannot hold `len` elements.
    pub(crate) fn relocate_into(&mut self, dst: &mut RawBuffer<T>) {
        assert_eq!(dst.len, 0, "relocation target must be empty");
        assert!(dst.capacity() >= self.len, "relocation target too small");
        // SAFETY: the two buffers are distinct allocations; the source range
        // is the initialised prefix and the destination has room for it.
        // Ownership moves bitwise, so the source prefix is forgotten by
        // zeroing its length.
        unsafe {
            ptr::copy_nonoverlapping(
                self.slots.as_ptr().cast::<T>(),
                dst.slots.as_mut_ptr().cast::<T>(),
                self.len,
            );
        }
        dst.len = self.len;
        self.len = 0;
    }

    /// Move every live element into the empty buffer `dst` with `value`
    /// placed at `index`, leaving `self` empty.
    ///
    /// The prefix `[0, index)`, the new element, and the suffix
    /// `[index, len)` land in their final slots in one pass.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, `dst` is not empty, or `dst` cannot hold
    /// `len + 1` elements.
    pub(crate) fn relocate_with_insert(&mut self, dst: &mut RawBuffer<T>, index: usize, value: T) {
        assert!(index <= self.len, "insert index past the live prefix");
        assert_eq!(dst.len, 0, "relocation target must be empty");
        assert!(dst.capacity() > self.len, "relocation target too small");
        let src = self.slots.as_ptr().cast::<T>();
        let out = dst.slots.as_mut_ptr().cast::<T>();
        // SAFETY: distinct allocations. [0, index) and [index, len) are the
        // initialised source prefix; their destinations [0, index) and
        // [index + 1, len + 1) plus slot `index` fit in `dst` because
        // `dst.capacity() > len`.
        unsafe {
            ptr::copy_nonoverlapping(src, out, index);
            ptr::write(out.add(index), value);
            ptr::copy_nonoverlapping(src.add(index), out.add(index + 1), self.len - index);
        }
        dst.len = self.len + 1;
        self.len = 0;
    }
}

#[cfg(test)]
impl RawBuffer<()> {
    /// A unit buffer of `capacity` slots whose first `len` are live.
    pub(crate) fn units(capacity: usize, len: usize) -> Self {
        assert!(len <= capacity);
        let mut buf = Self::allocate(capacity);
        buf.len = len;
        buf
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        self.truncate(0);
    }
}

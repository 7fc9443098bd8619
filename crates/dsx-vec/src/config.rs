//! Capacity defaults and the growth policy.
//!
//! Growth is computed purely in element counts: the new capacity is the
//! current one multiplied by [`GROWTH_FACTOR`], never less than the
//! array's configured default and never zero.

/// Capacity of an array built with no explicit size.
pub const DEFAULT_CAPACITY: usize = 5;

/// Multiplier applied to the capacity when the buffer is exhausted.
pub const GROWTH_FACTOR: usize = 2;

/// Capacity to grow to from `current`, floored at `floor`.
///
/// The result is at least one slot, so a zero `floor` on an empty buffer
/// still makes room for an element. Returns `None` if the multiplication
/// overflows.
pub fn grown_capacity(current: usize, floor: usize) -> Option<usize> {
    current
        .checked_mul(GROWTH_FACTOR)
        .map(|grown| grown.max(floor).max(1))
}

/// Whether appending one element at `len` must grow a buffer of `capacity`.
///
/// The append path keeps one slot of headroom: it grows as soon as
/// `len + 1` reaches the capacity.
pub fn push_needs_growth(len: usize, capacity: usize) -> bool {
    len.saturating_add(1) >= capacity
}

//! Error types for dynamic array operations.

use std::error::Error;
use std::fmt;

/// Errors that can occur during [`DynArray`](crate::DynArray) operations.
///
/// Every variant records the name of the operation that failed so the
/// message reads on its own, without a call-site backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DynArrayError {
    /// An index at or past the current length.
    OutOfRange {
        /// Operation that rejected the index.
        op: &'static str,
        /// The requested index.
        index: usize,
        /// Length of the array at the time of the call.
        len: usize,
    },
    /// A negative index. Negative indices are never resolved from the end.
    NegativeIndex {
        /// Operation that rejected the index.
        op: &'static str,
        /// The requested index.
        index: isize,
    },
    /// The allocator could not provide a buffer of the requested size.
    AllocationFailed {
        /// Operation that needed the new buffer.
        op: &'static str,
        /// Number of element slots requested.
        requested: usize,
    },
    /// The grown capacity does not fit in `usize`.
    CapacityOverflow {
        /// Operation that needed to grow.
        op: &'static str,
        /// Capacity before the attempted growth.
        current: usize,
    },
}

impl DynArrayError {
    /// Name of the operation that produced this error.
    pub fn op(&self) -> &'static str {
        match self {
            Self::OutOfRange { op, .. }
            | Self::NegativeIndex { op, .. }
            | Self::AllocationFailed { op, .. }
            | Self::CapacityOverflow { op, .. } => *op,
        }
    }
}

impl fmt::Display for DynArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { op, index, len } => {
                write!(
                    f,
                    "{op}: index {index} is out of bounds of array with len {len}"
                )
            }
            Self::NegativeIndex { op, index } => {
                write!(f, "{op}: negative index {index} is not supported")
            }
            Self::AllocationFailed { op, requested } => {
                write!(f, "{op}: allocation of {requested} slots failed")
            }
            Self::CapacityOverflow { op, current } => {
                write!(f, "{op}: growing capacity {current} overflows usize")
            }
        }
    }
}

impl Error for DynArrayError {}

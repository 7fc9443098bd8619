//! Contiguous growable array with explicit capacity management.
//!
//! [`DynArray`] owns a single heap buffer and keeps its live elements in
//! slots `[0, len)`. Capacity changes are explicit and observable:
//!
//! ```text
//! DynArray<T, DEFAULT_CAP>
//! └── RawBuffer<T> (Box<[MaybeUninit<T>]> + initialised prefix length)
//! ```
//!
//! - **Growth:** doubling, never below `DEFAULT_CAP` (see [`config`]).
//! - **Replacement:** grow, shrink, and clear allocate the new buffer
//!   before touching the old one, so allocation failure is reported as
//!   [`DynArrayError::AllocationFailed`] with the array unchanged.
//! - **Checked access:** `at`, `front`, and `back` return
//!   [`DynArrayError`] instead of reading unowned slots; negative indices
//!   are always rejected.
//!
//! All `unsafe` code lives in the private `raw` module.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod config;
pub mod error;
mod raw;

pub use array::DynArray;
pub use config::DEFAULT_CAPACITY;
pub use error::DynArrayError;

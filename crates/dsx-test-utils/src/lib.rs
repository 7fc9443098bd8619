//! Test utilities for dsx development.
//!
//! Provides a scripted [`Op`] vocabulary that can be replayed against a
//! [`DynArray`] and against a plain `Vec` reference model, plus a
//! drop-counting element type for ownership tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::Cell;
use std::rc::Rc;

use dsx_vec::DynArray;

/// One mutating call on a dynamic array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Push(i32),
    Pop,
    InsertAt { value: i32, index: usize },
    EraseAt(usize),
    Reserve(usize),
    Shrink,
    Truncate(usize),
    Resize(usize),
    Clear,
}

/// Apply `op` to `arr`, returning the element it removed, if any.
///
/// Allocation errors are not expected for the small sizes tests use and
/// panic with the error message.
pub fn apply_to_array<const N: usize>(arr: &mut DynArray<i32, N>, op: &Op) -> Option<i32> {
    let result = match *op {
        Op::Push(v) => arr.push(v).map(|()| None),
        Op::Pop => Ok(arr.pop()),
        Op::InsertAt { value, index } => arr.insert_at(value, index).map(|()| None),
        Op::EraseAt(index) => Ok(arr.erase_at(index)),
        Op::Reserve(n) => arr.reserve(n).map(|()| None),
        Op::Shrink => arr.shrink().map(|()| None),
        Op::Truncate(n) => {
            arr.truncate(n);
            Ok(None)
        }
        Op::Resize(n) => arr.resize(n).map(|()| None),
        Op::Clear => arr.clear().map(|()| None),
    };
    match result {
        Ok(removed) => removed,
        Err(e) => panic!("{op:?} failed: {e}"),
    }
}

/// Apply `op` to a `Vec` model with the same observable semantics.
pub fn apply_to_model(model: &mut Vec<i32>, op: &Op) -> Option<i32> {
    match *op {
        Op::Push(v) => {
            model.push(v);
            None
        }
        Op::Pop => model.pop(),
        Op::InsertAt { value, index } => {
            model.insert(index.min(model.len()), value);
            None
        }
        Op::EraseAt(index) => (index < model.len()).then(|| model.remove(index)),
        Op::Truncate(n) => {
            model.truncate(n);
            None
        }
        Op::Resize(n) => {
            model.resize(n, 0);
            None
        }
        Op::Clear => {
            model.clear();
            None
        }
        Op::Reserve(_) | Op::Shrink => None,
    }
}

/// An element that counts its own drops in a shared counter.
pub struct Tracked {
    pub id: u32,
    drops: Rc<Cell<usize>>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Hands out [`Tracked`] values that share one drop counter.
#[derive(Clone, Default)]
pub struct DropCounter {
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new tracked element with the given id.
    pub fn track(&self, id: u32) -> Tracked {
        Tracked {
            id,
            drops: Rc::clone(&self.drops),
        }
    }

    /// Number of tracked elements dropped so far.
    pub fn drops(&self) -> usize {
        self.drops.get()
    }
}

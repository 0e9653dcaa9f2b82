/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Overlap detection between operands and destinations.

use crate::{
    engine::{AssignOp, Target},
    operand::Operand,
    tracing::tracked_trace,
};

/// A range of addresses occupied by the storage of a destination.
///
/// Operands use this in [`Operand::can_alias`] to report whether evaluating them could
/// observe writes to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    start: usize,
    end: usize,
}

impl Region {
    /// The region covered by `len` elements starting at `ptr`.
    pub fn from_raw<T>(ptr: *const T, len: usize) -> Self {
        let start = ptr as usize;
        Self {
            start,
            end: start + len * std::mem::size_of::<T>(),
        }
    }

    /// The region covered by `slice`.
    pub fn of<T>(slice: &[T]) -> Self {
        Self::from_raw(slice.as_ptr(), slice.len())
    }

    /// Return `true` if the regions share at least one byte.
    pub fn overlaps(&self, other: Region) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    /// Return `true` if `ptr` points inside the region.
    pub fn contains<T>(&self, ptr: *const T) -> bool {
        let address = ptr as usize;
        self.start <= address && address < self.end
    }

    /// Return `true` if the region covers no memory.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An operand that is either read directly or through a materialized copy.
pub(crate) enum Guarded<'a, R: ?Sized, M> {
    Live(&'a R),
    Materialized(M),
}

impl<'a, R> Guarded<'a, R, R::Result>
where
    R: Operand + ?Sized,
{
    /// Materialize `rhs` if it may observe writes to `region`.
    #[track_caller]
    pub(crate) fn new(rhs: &'a R, region: Region) -> Self {
        if rhs.can_alias(region) {
            tracked_trace!(
                "materializing aliased operand of size {} before assignment",
                rhs.size()
            );
            Self::Materialized(rhs.evaluate())
        } else {
            Self::Live(rhs)
        }
    }

    pub(crate) fn is_materialized(&self) -> bool {
        matches!(self, Self::Materialized(_))
    }

    pub(crate) fn apply<Op>(&self, op: Op, dst: Target<'_, R::Element>)
    where
        Op: AssignOp<R::Element>,
    {
        match self {
            Self::Live(rhs) => rhs.apply(op, dst),
            Self::Materialized(rhs) => rhs.apply(op, dst),
        }
    }
}

///////////
// Tests //
///////////

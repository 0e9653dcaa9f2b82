/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! A sparse operand stored as ordered `(index, value)` entries.

use std::marker::PhantomData;

use thiserror::Error;

use crate::{
    alias::Region,
    engine::{self, AssignOp, Target},
    operand::{Operand, SparseOperand},
    Column, Element, Orientation,
};

/// An entry could not be added to a [`CompressedVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvalidEntry {
    #[error("entry index {index} is out of bounds for a vector of size {size}")]
    OutOfBounds { index: usize, size: usize },
    #[error("entry index {index} does not follow the previous index {previous}")]
    Unordered { index: usize, previous: usize },
}

/// A vector of logical length `size` storing only its nonzero entries.
///
/// Entries are kept in strictly increasing index order. Positions without an entry read as
/// `T::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedVector<T, TF = Column> {
    size: usize,
    entries: Vec<(usize, T)>,
    orientation: PhantomData<TF>,
}

impl<T: Element, TF: Orientation> CompressedVector<T, TF> {
    /// Construct an all-zero vector of length `size`.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            entries: Vec::new(),
            orientation: PhantomData,
        }
    }

    /// Construct a vector of length `size` from entries in increasing index order.
    pub fn try_from_entries<I>(size: usize, entries: I) -> Result<Self, InvalidEntry>
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let mut this = Self::new(size);
        for (index, value) in entries {
            this.try_push(index, value)?;
        }
        Ok(this)
    }

    /// Append an entry.
    ///
    /// `index` must be less than the size and greater than the index of every entry already
    /// present. Default values pass the same checks but are not stored.
    pub fn try_push(&mut self, index: usize, value: T) -> Result<(), InvalidEntry> {
        if index >= self.size {
            return Err(InvalidEntry::OutOfBounds {
                index,
                size: self.size,
            });
        }
        if let Some(&(previous, _)) = self.entries.last() {
            if index <= previous {
                return Err(InvalidEntry::Unordered { index, previous });
            }
        }

        if value != T::default() {
            self.entries.push((index, value));
        }
        Ok(())
    }

    /// Return the value at `index`, which is the default value for positions without an
    /// entry.
    pub fn get(&self, index: usize) -> T {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map_or_else(|_| T::default(), |pos| self.entries[pos].1)
    }

    /// The number of stored entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// The logical length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The stored entries in increasing index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, T)> + '_ {
        self.entries.iter().copied()
    }
}

impl<T: Element, TF: Orientation> Operand for CompressedVector<T, TF> {
    type Element = T;
    type Orientation = TF;
    type Result = Self;
    const SPARSE: bool = true;

    fn size(&self) -> usize {
        self.size
    }

    fn can_alias(&self, _region: Region) -> bool {
        false
    }

    fn evaluate(&self) -> Self {
        self.clone()
    }

    fn apply<Op: AssignOp<T>>(&self, op: Op, dst: Target<'_, T>) {
        engine::sparse(op, self, dst)
    }
}

impl<T: Element, TF: Orientation> SparseOperand for CompressedVector<T, TF> {
    fn nonzeros(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.iter()
    }

    fn nnz(&self) -> usize {
        self.entries.len()
    }
}

///////////
// Tests //
///////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{expr::Transpose, Row};

    #[test]
    fn construction() {
        let v: CompressedVector<f32> =
            CompressedVector::try_from_entries(6, [(1, 2.0), (3, 0.0), (5, -1.0)]).unwrap();
        assert_eq!(v.size(), 6);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(1), 2.0);
        assert_eq!(v.get(3), 0.0);
        assert_eq!(v.get(4), 0.0);
        assert_eq!(v.get(5), -1.0);
        assert_eq!(v.iter().collect::<Vec<_>>(), [(1, 2.0), (5, -1.0)]);
    }

    #[test]
    fn rejects_bad_entries() {
        let mut v: CompressedVector<i32> = CompressedVector::new(4);
        assert_eq!(
            v.try_push(4, 1),
            Err(InvalidEntry::OutOfBounds { index: 4, size: 4 })
        );

        v.try_push(2, 1).unwrap();
        assert_eq!(
            v.try_push(2, 5),
            Err(InvalidEntry::Unordered {
                index: 2,
                previous: 2
            })
        );
        assert_eq!(
            v.try_push(1, 5),
            Err(InvalidEntry::Unordered {
                index: 1,
                previous: 2
            })
        );
        assert_eq!(v.nnz(), 1);

        let err = CompressedVector::<u8>::try_from_entries(3, [(0, 1), (7, 1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "entry index 7 is out of bounds for a vector of size 3"
        );
    }

    #[test]
    fn operand_protocol() {
        let v: CompressedVector<u32> =
            CompressedVector::try_from_entries(3, [(0, 4), (2, 8)]).unwrap();
        assert!(<CompressedVector<u32> as Operand>::SPARSE);
        assert!(!v.can_alias(Region::of(&[0u32; 3])));
        assert_eq!(v.evaluate(), v);
        assert_eq!(SparseOperand::nnz(&v), 2);

        let mut dst = [1u32, 1, 1];
        v.apply(engine::op::Add, Target::new(&mut dst, 3));
        assert_eq!(dst, [5, 1, 9]);
    }

    #[test]
    fn transposed_sparse() {
        let v: CompressedVector<i16> =
            CompressedVector::try_from_entries(4, [(3, 2)]).unwrap();
        let t = Transpose::new(&v);
        assert!(<Transpose<&CompressedVector<i16>> as Operand>::SPARSE);
        assert_eq!(t.nonzeros().collect::<Vec<_>>(), [(3, 2)]);

        let evaluated: Transpose<CompressedVector<i16>> = t.evaluate();
        assert_eq!(evaluated.into_inner(), v);

        type Flipped = <Transpose<CompressedVector<i16>> as Operand>::Orientation;
        assert!(<Flipped as Orientation>::ROW);

        type Back = <Transpose<CompressedVector<i16, Row>> as Operand>::Orientation;
        assert!(!<Back as Orientation>::ROW);
    }
}

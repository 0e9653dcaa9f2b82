/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! The capability protocol for right-hand operands.
//!
//! Anything implementing [`Operand`] plus one of [`DenseOperand`] or [`SparseOperand`] can
//! be assigned, added, subtracted and multiplied into a [`crate::HybridVector`] of the same
//! element type and orientation.
//!
//! Implementations provide [`Operand::apply`] by forwarding to [`crate::engine::dense`] or
//! [`crate::engine::sparse`], which selects the traversal for the operand kind.

use diskann_wide::Architecture;

use crate::{
    alias::Region,
    engine::{self, AssignOp, Target},
    layout::REGISTER_BYTES,
    Column, Element, Orientation,
};

/// Requirements shared by dense and sparse operands.
pub trait Operand {
    /// The element type yielded by the operand.
    type Element: Element;

    /// The orientation of the operand.
    type Orientation: Orientation;

    /// The owned container produced by eager evaluation.
    type Result: Operand<Element = Self::Element, Orientation = Self::Orientation>;

    /// Whether the operand is traversed as `(index, value)` pairs.
    const SPARSE: bool = false;

    /// The logical length of the operand.
    fn size(&self) -> usize;

    /// Return `true` if evaluating the operand might read memory in `region`.
    ///
    /// Returning `true` is always correct. Returning `false` allows assignment to read the
    /// operand while writing to `region`.
    fn can_alias(&self, region: Region) -> bool;

    /// Evaluate the operand into owned storage.
    fn evaluate(&self) -> Self::Result;

    /// Combine the operand into `dst` with `op`.
    ///
    /// The caller guarantees that `dst.size() == self.size()`.
    fn apply<Op>(&self, op: Op, dst: Target<'_, Self::Element>)
    where
        Op: AssignOp<Self::Element>;
}

/// Operands with indexed access to every position.
pub trait DenseOperand: Operand {
    /// Whether [`DenseOperand::load`] is backed by register loads. When `false`, the
    /// scalar path is used and `load` is never called by the engine.
    const VECTORIZABLE: bool;

    /// Return the element at position `i`.
    ///
    /// Panics or returns an unspecified value if `i >= self.size()`.
    fn at(&self, i: usize) -> Self::Element;

    /// Load the block of elements starting at position `i`.
    ///
    /// Lanes at or past `self.size()` hold unspecified values.
    ///
    /// # Safety
    ///
    /// `i < self.size()` and `i` is a multiple of `Self::Element::LANES`.
    #[inline(always)]
    unsafe fn load<A: Architecture>(
        &self,
        arch: A,
        i: usize,
    ) -> <Self::Element as Element>::Register<A> {
        let mut buffer = [<Self::Element as Default>::default(); REGISTER_BYTES];
        let count = (self.size() - i).min(<Self::Element as Element>::LANES);
        buffer
            .iter_mut()
            .take(count)
            .enumerate()
            .for_each(|(j, b)| *b = self.at(i + j));

        // SAFETY: `LANES` never exceeds `REGISTER_BYTES`, so the whole block lies in
        // `buffer`.
        unsafe { <Self::Element as Element>::load_block(arch, buffer.as_ptr()) }
    }
}

/// Operands that are traversed by their nonzero entries.
pub trait SparseOperand: Operand {
    /// Return the `(index, value)` pairs of the operand with strictly increasing index,
    /// skipping entries equal to the default value.
    fn nonzeros(&self) -> impl Iterator<Item = (usize, Self::Element)> + '_;

    /// Return the number of stored entries. This is an upper bound on the length of
    /// [`SparseOperand::nonzeros`].
    fn nnz(&self) -> usize;
}

////////////
// Slices //
////////////

/// Load from a contiguous buffer of `len` elements.
///
/// # Safety
///
/// `ptr` must be valid for reads of `len` elements and `i < len`.
#[inline(always)]
pub(crate) unsafe fn load_contiguous<T: Element, A: Architecture>(
    arch: A,
    ptr: *const T,
    len: usize,
    i: usize,
) -> T::Register<A> {
    let remaining = len - i;
    // SAFETY: The caller guarantees `remaining` elements are readable at `ptr + i`, and
    // we read no more than that.
    unsafe {
        if remaining >= T::LANES {
            T::load_block(arch, ptr.add(i))
        } else {
            T::load_first(arch, ptr.add(i), remaining)
        }
    }
}

impl<T: Element> Operand for [T] {
    type Element = T;
    type Orientation = Column;
    type Result = Vec<T>;

    fn size(&self) -> usize {
        self.len()
    }

    fn can_alias(&self, region: Region) -> bool {
        Region::of(self).overlaps(region)
    }

    fn evaluate(&self) -> Vec<T> {
        self.to_vec()
    }

    fn apply<Op: AssignOp<T>>(&self, op: Op, dst: Target<'_, T>) {
        engine::dense(op, self, dst)
    }
}

impl<T: Element> DenseOperand for [T] {
    const VECTORIZABLE: bool = T::VECTORIZABLE;

    #[inline(always)]
    fn at(&self, i: usize) -> T {
        self[i]
    }

    #[inline(always)]
    unsafe fn load<A: Architecture>(&self, arch: A, i: usize) -> T::Register<A> {
        debug_assert!(i < self.len());
        // SAFETY: The slice is valid for `self.len()` reads and the caller guarantees
        // `i < self.len()`.
        unsafe { load_contiguous(arch, self.as_ptr(), self.len(), i) }
    }
}

// `Vec` and arrays read through their slice.
macro_rules! forward_to_slice {
    ($({$($generics:tt)*} $ty:ty),+ $(,)?) => {
        $(
            impl<$($generics)*> Operand for $ty {
                type Element = T;
                type Orientation = Column;
                type Result = Vec<T>;

                fn size(&self) -> usize {
                    self.len()
                }

                fn can_alias(&self, region: Region) -> bool {
                    self.as_slice().can_alias(region)
                }

                fn evaluate(&self) -> Vec<T> {
                    self.to_vec()
                }

                fn apply<Op: AssignOp<T>>(&self, op: Op, dst: Target<'_, T>) {
                    engine::dense(op, self.as_slice(), dst)
                }
            }

            impl<$($generics)*> DenseOperand for $ty {
                const VECTORIZABLE: bool = T::VECTORIZABLE;

                #[inline(always)]
                fn at(&self, i: usize) -> T {
                    self[i]
                }

                #[inline(always)]
                unsafe fn load<A: Architecture>(&self, arch: A, i: usize) -> T::Register<A> {
                    // SAFETY: Inherited from caller.
                    unsafe { self.as_slice().load(arch, i) }
                }
            }
        )+
    };
}

forward_to_slice!({T: Element} Vec<T>, {T: Element, const M: usize} [T; M]);

////////////////
// References //
////////////////

impl<X: Operand + ?Sized> Operand for &X {
    type Element = X::Element;
    type Orientation = X::Orientation;
    type Result = X::Result;
    const SPARSE: bool = X::SPARSE;

    fn size(&self) -> usize {
        (**self).size()
    }

    fn can_alias(&self, region: Region) -> bool {
        (**self).can_alias(region)
    }

    fn evaluate(&self) -> X::Result {
        (**self).evaluate()
    }

    fn apply<Op: AssignOp<X::Element>>(&self, op: Op, dst: Target<'_, X::Element>) {
        (**self).apply(op, dst)
    }
}

impl<X: DenseOperand + ?Sized> DenseOperand for &X {
    const VECTORIZABLE: bool = X::VECTORIZABLE;

    #[inline(always)]
    fn at(&self, i: usize) -> X::Element {
        (**self).at(i)
    }

    #[inline(always)]
    unsafe fn load<A: Architecture>(
        &self,
        arch: A,
        i: usize,
    ) -> <X::Element as Element>::Register<A> {
        // SAFETY: Inherited from caller.
        unsafe { (**self).load(arch, i) }
    }
}

impl<X: SparseOperand + ?Sized> SparseOperand for &X {
    fn nonzeros(&self) -> impl Iterator<Item = (usize, X::Element)> + '_ {
        (**self).nonzeros()
    }

    fn nnz(&self) -> usize {
        (**self).nnz()
    }
}

///////////
// Tests //
///////////

#[cfg(test)]
mod tests {
    use diskann_wide::{arch::Scalar, SIMDVector};

    use super::*;

    #[test]
    fn slice_operands() {
        let v = vec![1.0f32, 2.0, 3.0];
        assert_eq!(Operand::size(&v), 3);
        assert_eq!(DenseOperand::at(&v, 1), 2.0);
        assert_eq!(Operand::size(&[1u8; 5]), 5);
        assert_eq!(Operand::size(v.as_slice()), 3);
        assert!(!<Vec<f32> as Operand>::SPARSE);
        assert!(<[f32; 2] as DenseOperand>::VECTORIZABLE);
        assert!(!<Vec<f64> as DenseOperand>::VECTORIZABLE);
    }

    #[test]
    fn slice_alias() {
        let v = vec![0i32; 8];
        assert!(v.can_alias(Region::of(&v[4..])));
        assert!(!v.can_alias(Region::of(&[0i32; 8])));
        assert!((&v).can_alias(Region::of(&v)));
    }

    #[test]
    fn masked_load_stops_at_size() {
        let arch = Scalar::new();
        let v: Vec<i32> = (1..=11).collect();

        // SAFETY: Both block indices are multiples of 8 and below the length.
        let (head, tail) = unsafe { (v.load(arch, 0), v.load(arch, 8)) };
        assert_eq!(head.to_array(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(tail.to_array(), [9, 10, 11, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn gathering_load() {
        struct Odd(usize);

        impl Operand for Odd {
            type Element = u32;
            type Orientation = Column;
            type Result = Vec<u32>;

            fn size(&self) -> usize {
                self.0
            }
            fn can_alias(&self, _: Region) -> bool {
                false
            }
            fn evaluate(&self) -> Vec<u32> {
                (0..self.0).map(|i| self.at(i)).collect()
            }
            fn apply<Op: AssignOp<u32>>(&self, op: Op, dst: Target<'_, u32>) {
                engine::dense(op, self, dst)
            }
        }

        impl DenseOperand for Odd {
            const VECTORIZABLE: bool = false;
            fn at(&self, i: usize) -> u32 {
                2 * i as u32 + 1
            }
        }

        let odd = Odd(3);
        // SAFETY: `0 < 3` and is a multiple of the lane count.
        let block = unsafe { odd.load(Scalar::new(), 0) };
        assert_eq!(block.to_array(), [1, 3, 5, 0, 0, 0, 0, 0]);
        assert_eq!(odd.evaluate(), [1, 3, 5]);
    }
}

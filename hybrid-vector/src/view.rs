/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Owned and borrowed dense operands that are not fixed-capacity vectors.

use std::marker::PhantomData;

use diskann_wide::Architecture;

use crate::{
    alias::Region,
    engine::{self, AssignOp, Target},
    operand::{load_contiguous, DenseOperand, Operand},
    Column, Element, Orientation,
};

/// A heap-allocated dense vector of any orientation.
///
/// This is the evaluated form of the lazy expressions and of [`RawView`].
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicVector<T, TF = Column> {
    data: Vec<T>,
    orientation: PhantomData<TF>,
}

impl<T, TF> DynamicVector<T, TF> {
    /// Wrap `data`.
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            orientation: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<T> {
        self.data
    }
}

impl<T: Element, TF: Orientation> DynamicVector<T, TF> {
    /// Evaluate `rhs` into a new vector.
    pub fn from_operand<R>(rhs: &R) -> Self
    where
        R: Operand<Element = T, Orientation = TF> + ?Sized,
    {
        let size = rhs.size();
        let mut data = vec![T::default(); size];
        rhs.apply(engine::op::Replace, Target::new(&mut data, size));
        Self::new(data)
    }
}

impl<T: Element, TF: Orientation> Operand for DynamicVector<T, TF> {
    type Element = T;
    type Orientation = TF;
    type Result = Self;

    fn size(&self) -> usize {
        self.data.len()
    }

    fn can_alias(&self, region: Region) -> bool {
        Region::of(&self.data).overlaps(region)
    }

    fn evaluate(&self) -> Self {
        self.clone()
    }

    fn apply<Op: AssignOp<T>>(&self, op: Op, dst: Target<'_, T>) {
        engine::dense(op, self, dst)
    }
}

impl<T: Element, TF: Orientation> DenseOperand for DynamicVector<T, TF> {
    const VECTORIZABLE: bool = T::VECTORIZABLE;

    #[inline(always)]
    fn at(&self, i: usize) -> T {
        self.data[i]
    }

    #[inline(always)]
    unsafe fn load<A: Architecture>(&self, arch: A, i: usize) -> T::Register<A> {
        // SAFETY: `data` is readable for its length and the caller guarantees `i` is below
        // it.
        unsafe { load_contiguous(arch, self.data.as_ptr(), self.data.len(), i) }
    }
}

/// An unchecked view of `len` contiguous elements.
///
/// Unlike a slice, a view carries no borrow, so it can describe memory that is also the
/// destination of an assignment. Assignments detect this with [`Operand::can_alias`] and
/// read the view into a temporary before writing.
///
/// ```
/// use hybrid_vector::{hybrid, RawView, Sum};
///
/// let mut v = <hybrid!(i32, 4)>::from([1, 2, 3]);
/// // SAFETY: `v` outlives the view and holds 3 elements.
/// let view: RawView<i32> = unsafe { RawView::from_raw_parts(v.data(), v.size()) };
/// let doubled = Sum::new(&view, &view).unwrap();
///
/// v.try_assign(&doubled).unwrap();
/// assert_eq!(v, [2, 4, 6]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RawView<T, TF = Column> {
    ptr: *const T,
    len: usize,
    orientation: PhantomData<TF>,
}

impl<T, TF> RawView<T, TF> {
    /// Construct a view of the `len` elements at `ptr`.
    ///
    /// # Safety
    ///
    /// For as long as the view is used, `ptr` must be valid for reads of `len` elements.
    /// The memory may be modified between uses, but not while the view is being read.
    pub unsafe fn from_raw_parts(ptr: *const T, len: usize) -> Self {
        Self {
            ptr,
            len,
            orientation: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Element, TF: Orientation> Operand for RawView<T, TF> {
    type Element = T;
    type Orientation = TF;
    type Result = DynamicVector<T, TF>;

    fn size(&self) -> usize {
        self.len
    }

    fn can_alias(&self, region: Region) -> bool {
        Region::from_raw(self.ptr, self.len).overlaps(region)
    }

    fn evaluate(&self) -> DynamicVector<T, TF> {
        DynamicVector::from_operand(self)
    }

    fn apply<Op: AssignOp<T>>(&self, op: Op, dst: Target<'_, T>) {
        engine::dense(op, self, dst)
    }
}

impl<T: Element, TF: Orientation> DenseOperand for RawView<T, TF> {
    const VECTORIZABLE: bool = T::VECTORIZABLE;

    #[inline(always)]
    fn at(&self, i: usize) -> T {
        assert!(i < self.len, "index {} out of range for view of {}", i, self.len);
        // SAFETY: The constructor guarantees `len` readable elements.
        unsafe { self.ptr.add(i).read() }
    }

    #[inline(always)]
    unsafe fn load<A: Architecture>(&self, arch: A, i: usize) -> T::Register<A> {
        // SAFETY: The constructor guarantees `len` readable elements and the caller
        // guarantees `i < len`.
        unsafe { load_contiguous(arch, self.ptr, self.len, i) }
    }
}

///////////
// Tests //
///////////

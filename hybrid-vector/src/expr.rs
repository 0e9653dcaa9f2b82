/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Lazily evaluated operands.
//!
//! Expressions are evaluated element-by-element (or block-by-block) while being assigned,
//! without intermediate storage. An expression is vectorizable when all of its children
//! are and its own operation has a block form.

use std::marker::PhantomData;

use diskann_wide::Architecture;

use crate::{
    alias::Region,
    engine::{self, op, Arithmetic, AssignOp, Target},
    error::SizeMismatch,
    operand::{DenseOperand, Operand, SparseOperand},
    view::DynamicVector,
    Element, Orientation,
};

/// The element-wise combination of two dense operands of equal size.
#[derive(Debug, Clone, Copy)]
pub struct Binary<L, R, K> {
    lhs: L,
    rhs: R,
    kind: PhantomData<K>,
}

/// `lhs + rhs`
pub type Sum<L, R> = Binary<L, R, op::Add>;

/// `lhs - rhs`
pub type Difference<L, R> = Binary<L, R, op::Sub>;

/// `lhs * rhs`, component-wise.
pub type Product<L, R> = Binary<L, R, op::Mul>;

impl<L, R, K> Binary<L, R, K>
where
    L: DenseOperand,
    R: DenseOperand<Element = L::Element, Orientation = L::Orientation>,
    K: Arithmetic<L::Element>,
{
    /// Combine `lhs` and `rhs`, which must have the same size.
    #[track_caller]
    pub fn new(lhs: L, rhs: R) -> Result<Self, SizeMismatch> {
        SizeMismatch::check(lhs.size(), rhs.size())?;
        Ok(Self {
            lhs,
            rhs,
            kind: PhantomData,
        })
    }
}

impl<L, R, K> Operand for Binary<L, R, K>
where
    L: DenseOperand,
    R: DenseOperand<Element = L::Element, Orientation = L::Orientation>,
    K: Arithmetic<L::Element>,
{
    type Element = L::Element;
    type Orientation = L::Orientation;
    type Result = DynamicVector<L::Element, L::Orientation>;

    fn size(&self) -> usize {
        self.lhs.size()
    }

    fn can_alias(&self, region: Region) -> bool {
        self.lhs.can_alias(region) || self.rhs.can_alias(region)
    }

    fn evaluate(&self) -> Self::Result {
        DynamicVector::from_operand(self)
    }

    fn apply<Op: AssignOp<L::Element>>(&self, op: Op, dst: Target<'_, L::Element>) {
        engine::dense(op, self, dst)
    }
}

impl<L, R, K> DenseOperand for Binary<L, R, K>
where
    L: DenseOperand,
    R: DenseOperand<Element = L::Element, Orientation = L::Orientation>,
    K: Arithmetic<L::Element>,
{
    const VECTORIZABLE: bool = L::VECTORIZABLE && R::VECTORIZABLE && K::VECTORIZED;

    #[inline(always)]
    fn at(&self, i: usize) -> L::Element {
        K::scalar(self.lhs.at(i), self.rhs.at(i))
    }

    #[inline(always)]
    unsafe fn load<A: Architecture>(
        &self,
        arch: A,
        i: usize,
    ) -> <L::Element as Element>::Register<A> {
        // SAFETY: Both children have our size, so the caller's guarantee carries over.
        let (x, y) = unsafe { (self.lhs.load(arch, i), self.rhs.load(arch, i)) };
        K::block::<A>(x, y)
    }
}

/// A dense operand multiplied by a scalar.
#[derive(Debug, Clone, Copy)]
pub struct Scaled<X, T> {
    operand: X,
    factor: T,
}

impl<X, T> Scaled<X, T>
where
    X: DenseOperand<Element = T>,
    T: Element,
{
    pub fn new(operand: X, factor: T) -> Self {
        Self { operand, factor }
    }
}

impl<X, T> Operand for Scaled<X, T>
where
    X: DenseOperand<Element = T>,
    T: Element,
{
    type Element = T;
    type Orientation = X::Orientation;
    type Result = DynamicVector<T, X::Orientation>;

    fn size(&self) -> usize {
        self.operand.size()
    }

    fn can_alias(&self, region: Region) -> bool {
        self.operand.can_alias(region)
    }

    fn evaluate(&self) -> Self::Result {
        DynamicVector::from_operand(self)
    }

    fn apply<Op: AssignOp<T>>(&self, op: Op, dst: Target<'_, T>) {
        engine::dense(op, self, dst)
    }
}

impl<X, T> DenseOperand for Scaled<X, T>
where
    X: DenseOperand<Element = T>,
    T: Element,
{
    const VECTORIZABLE: bool = X::VECTORIZABLE && T::SIMD_MUL;

    #[inline(always)]
    fn at(&self, i: usize) -> T {
        T::mul_scalar(self.operand.at(i), self.factor)
    }

    #[inline(always)]
    unsafe fn load<A: Architecture>(&self, arch: A, i: usize) -> T::Register<A> {
        // SAFETY: Inherited from caller.
        let x = unsafe { self.operand.load(arch, i) };
        T::mul_block::<A>(x, T::splat(arch, self.factor))
    }
}

/// A dense operand converted element-wise to `U`.
///
/// Conversions are applied one element at a time.
#[derive(Debug, Clone, Copy)]
pub struct Cast<X, U> {
    operand: X,
    target: PhantomData<U>,
}

impl<X, U> Cast<X, U>
where
    X: DenseOperand,
    U: Element + From<X::Element>,
{
    pub fn new(operand: X) -> Self {
        Self {
            operand,
            target: PhantomData,
        }
    }
}

impl<X, U> Operand for Cast<X, U>
where
    X: DenseOperand,
    U: Element + From<X::Element>,
{
    type Element = U;
    type Orientation = X::Orientation;
    type Result = DynamicVector<U, X::Orientation>;

    fn size(&self) -> usize {
        self.operand.size()
    }

    fn can_alias(&self, region: Region) -> bool {
        self.operand.can_alias(region)
    }

    fn evaluate(&self) -> Self::Result {
        DynamicVector::from_operand(self)
    }

    fn apply<Op: AssignOp<U>>(&self, op: Op, dst: Target<'_, U>) {
        engine::dense(op, self, dst)
    }
}

impl<X, U> DenseOperand for Cast<X, U>
where
    X: DenseOperand,
    U: Element + From<X::Element>,
{
    const VECTORIZABLE: bool = false;

    #[inline(always)]
    fn at(&self, i: usize) -> U {
        U::from(self.operand.at(i))
    }
}

/// An operand viewed with the opposite orientation.
#[derive(Debug, Clone, Copy)]
pub struct Transpose<X>(X);

impl<X: Operand> Transpose<X> {
    pub fn new(operand: X) -> Self {
        Self(operand)
    }

    pub fn into_inner(self) -> X {
        self.0
    }
}

impl<X: Operand> Operand for Transpose<X> {
    type Element = X::Element;
    type Orientation = <X::Orientation as Orientation>::Transposed;
    type Result = Transpose<X::Result>;
    const SPARSE: bool = X::SPARSE;

    fn size(&self) -> usize {
        self.0.size()
    }

    fn can_alias(&self, region: Region) -> bool {
        self.0.can_alias(region)
    }

    fn evaluate(&self) -> Self::Result {
        Transpose(self.0.evaluate())
    }

    fn apply<Op: AssignOp<X::Element>>(&self, op: Op, dst: Target<'_, X::Element>) {
        self.0.apply(op, dst)
    }
}

impl<X: DenseOperand> DenseOperand for Transpose<X> {
    const VECTORIZABLE: bool = X::VECTORIZABLE;

    #[inline(always)]
    fn at(&self, i: usize) -> X::Element {
        self.0.at(i)
    }

    #[inline(always)]
    unsafe fn load<A: Architecture>(
        &self,
        arch: A,
        i: usize,
    ) -> <X::Element as Element>::Register<A> {
        // SAFETY: Inherited from caller.
        unsafe { self.0.load(arch, i) }
    }
}

impl<X: SparseOperand> SparseOperand for Transpose<X> {
    fn nonzeros(&self) -> impl Iterator<Item = (usize, X::Element)> + '_ {
        self.0.nonzeros()
    }

    fn nnz(&self) -> usize {
        self.0.nnz()
    }
}

///////////
// Tests //
///////////

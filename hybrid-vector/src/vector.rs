/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{
    marker::PhantomData,
    ops::{Div, DivAssign, Index, IndexMut, MulAssign},
};

use diskann_wide::Architecture;

use crate::{
    alias::{Guarded, Region},
    engine::{self, op, AssignOp, Target},
    error::{InvalidSize, SizeMismatch},
    layout::{Aligned, Fits, Layout},
    operand::{DenseOperand, Operand},
    tracing::tracked_trace,
    Column, Element, Orientation,
};

/// A dense vector with a fixed maximum size `N` and inline storage.
///
/// The logical size can change at runtime, but never exceeds `N`. Elements are stored
/// inline in a buffer of `NN` elements aligned to the register width, where `NN` is `N`
/// rounded up to a multiple of the register lane count of `T`. This lets arithmetic run
/// in whole registers without special handling for a ragged end.
///
/// Because `NN` cannot be computed from `N` in a generic signature, it is a separate
/// parameter. Use the [`crate::hybrid!`] macro to spell the type:
///
/// ```
/// use hybrid_vector::hybrid;
///
/// type V = hybrid!(f32, 6);
/// let mut v = V::from([1.0, 2.0, 3.0]);
/// assert_eq!(v.size(), 3);
/// assert_eq!(v.capacity(), 8);
///
/// v.try_add_assign(&[1.0, 1.0, 1.0]).unwrap();
/// assert_eq!(v, [2.0, 3.0, 4.0]);
/// ```
///
/// Any other `NN` fails to compile on first use:
///
/// ```compile_fail
/// use hybrid_vector::HybridVector;
///
/// // `f32` registers hold 8 lanes, so the padded capacity for 6 elements is 8.
/// let v = HybridVector::<f32, 6, 6>::new();
/// ```
///
/// # Invariants
///
/// * `size() <= N`.
/// * If `T::NUMERIC`, every element in `[size(), NN)` is `T::default()`.
#[derive(Clone)]
pub struct HybridVector<T, const N: usize, const NN: usize, TF = Column> {
    storage: Aligned<T, NN>,
    size: usize,
    orientation: PhantomData<TF>,
}

impl<T, const N: usize, const NN: usize, TF> HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    /// The maximum logical size.
    pub const MAX_SIZE: usize = N;

    /// Construct an empty vector.
    pub fn new() -> Self {
        let () = Layout::<T, N, NN>::CHECK;
        Self {
            storage: Aligned([T::default(); NN]),
            size: 0,
            orientation: PhantomData,
        }
    }

    /// Construct a vector of `size` default elements.
    #[track_caller]
    pub fn with_size(size: usize) -> Result<Self, InvalidSize> {
        InvalidSize::check(size, N)?;
        let mut this = Self::new();
        this.size = size;
        Ok(this)
    }

    /// Construct a vector of `size` copies of `value`.
    #[track_caller]
    pub fn filled(size: usize, value: T) -> Result<Self, InvalidSize> {
        let mut this = Self::with_size(size)?;
        this.as_mut_slice().fill(value);
        Ok(this)
    }

    /// Construct a vector holding a copy of `data`.
    #[track_caller]
    pub fn from_slice(data: &[T]) -> Result<Self, InvalidSize> {
        let mut this = Self::with_size(data.len())?;
        this.as_mut_slice().copy_from_slice(data);
        Ok(this)
    }

    /// Construct a vector holding a copy of the `size` elements at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `size` elements of `T`, unless `size > N`, in which
    /// case nothing is read.
    #[track_caller]
    pub unsafe fn from_ptr(size: usize, ptr: *const T) -> Result<Self, InvalidSize> {
        let mut this = Self::with_size(size)?;
        // SAFETY: The caller guarantees `ptr` is readable for `size` elements. The
        // destination holds at least `N >= size` elements and cannot overlap a source that
        // existed before it.
        unsafe { std::ptr::copy_nonoverlapping(ptr, this.storage.0.as_mut_ptr(), size) };
        Ok(this)
    }

    /// Construct a vector by evaluating `rhs`.
    #[track_caller]
    pub fn try_from_operand<R>(rhs: &R) -> Result<Self, InvalidSize>
    where
        R: Operand<Element = T, Orientation = TF> + ?Sized,
    {
        InvalidSize::check(rhs.size(), N)?;
        Ok(Self::evaluated(rhs))
    }

    /// Evaluate `rhs` into a new vector. `rhs.size() <= N` is a precondition.
    fn evaluated<R>(rhs: &R) -> Self
    where
        R: Operand<Element = T, Orientation = TF> + ?Sized,
    {
        let mut this = Self::new();
        this.size = rhs.size();
        rhs.apply(op::Replace, this.target());
        this
    }

    //--------//
    // Access //
    //--------//

    /// Return the logical size.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Return the padded capacity `NN`. The logical size is limited to `N`, not this.
    #[inline]
    pub fn capacity(&self) -> usize {
        NN
    }

    /// Return `true` if the logical size is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The elements `[0, size())`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.storage.0[..self.size]
    }

    /// The elements `[0, size())`.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.storage.0[..self.size]
    }

    /// Return the element at `i`, or `None` if `i >= size()`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&T> {
        self.as_slice().get(i)
    }

    /// Return the element at `i`, or `None` if `i >= size()`.
    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Pointer to the first element of the storage.
    #[inline]
    pub fn data(&self) -> *const T {
        self.storage.0.as_ptr()
    }

    /// Pointer to the first element of the storage.
    #[inline]
    pub fn data_mut(&mut self) -> *mut T {
        self.storage.0.as_mut_ptr()
    }

    /// Return `true` if the storage is aligned to the register width.
    pub fn is_aligned(&self) -> bool {
        self.storage.0.as_ptr().align_offset(std::mem::align_of::<Aligned<T, NN>>()) == 0
    }

    /// The memory occupied by the storage, including padding.
    pub fn region(&self) -> Region {
        Region::of(&self.storage.0)
    }

    /// Return `true` if `ptr` points into the storage of this vector.
    pub fn can_alias<U>(&self, ptr: *const U) -> bool {
        self.region().contains(ptr)
    }

    /// Return `true` if `ptr` points into the storage of this vector.
    ///
    /// Unlike operands with indirect storage, the storage of a vector is known exactly, so
    /// this is the same as [`Self::can_alias`].
    pub fn is_aliased<U>(&self, ptr: *const U) -> bool {
        self.can_alias(ptr)
    }

    /// Load the register block starting at `i`.
    ///
    /// Lanes at or past `size()` are `T::default()` when `T::NUMERIC`.
    ///
    /// # Safety
    ///
    /// `i` is a multiple of `T::LANES` and `i < NN`.
    #[inline(always)]
    pub unsafe fn load<A: Architecture>(&self, arch: A, i: usize) -> T::Register<A> {
        debug_assert!(i.is_multiple_of(T::LANES) && i < NN);
        // SAFETY: `NN` is a multiple of `LANES`, so a block starting at an aligned `i < NN`
        // ends inside the storage.
        unsafe { T::load_block(arch, self.storage.0.as_ptr().add(i)) }
    }

    /// Store the register block starting at `i`.
    ///
    /// # Safety
    ///
    /// `i` is a multiple of `T::LANES` and `i < NN`. When `T::NUMERIC`, lanes of `block`
    /// that land at or past `size()` must be `T::default()`.
    #[inline(always)]
    pub unsafe fn store<A: Architecture>(&mut self, i: usize, block: T::Register<A>) {
        debug_assert!(i.is_multiple_of(T::LANES) && i < NN);
        // SAFETY: See `load`.
        unsafe { T::store_block::<A>(block, self.storage.0.as_mut_ptr().add(i)) }
    }

    //--------//
    // Sizing //
    //--------//

    /// Change the logical size to `size`.
    ///
    /// On shrinking, vacated positions of numeric types are reset to the default value. On
    /// growing, new positions keep whatever the storage holds, which is the default value
    /// for numeric types.
    ///
    /// Storage is never relocated, so retained values are always preserved and `_preserve`
    /// has no effect.
    #[track_caller]
    pub fn resize(&mut self, size: usize, _preserve: bool) -> Result<(), InvalidSize> {
        InvalidSize::check(size, N)?;
        self.set_size(size);
        Ok(())
    }

    /// Grow the logical size by `delta`. See [`Self::resize`].
    #[track_caller]
    pub fn extend(&mut self, delta: usize, preserve: bool) -> Result<(), InvalidSize> {
        self.resize(self.size.saturating_add(delta), preserve)
    }

    /// Set the logical size to zero.
    pub fn clear(&mut self) {
        self.set_size(0);
    }

    fn set_size(&mut self, size: usize) {
        debug_assert!(size <= N);
        if T::NUMERIC && size < self.size {
            self.storage.0[size..self.size].fill(T::default());
        }
        self.size = size;
    }

    //----------//
    // Contents //
    //----------//

    /// Set every element in `[0, size())` to the default value. The size is unchanged.
    pub fn reset(&mut self) {
        self.as_mut_slice().fill(T::default());
    }

    /// Set every element in `[0, size())` to `value`.
    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// Return the number of elements in `[0, size())` that differ from the default value.
    pub fn non_zeros(&self) -> usize {
        let zero = T::default();
        self.iter().filter(|x| **x != zero).count()
    }

    /// Multiply every element in `[0, size())` by `factor`.
    pub fn scale(&mut self, factor: T) -> &mut Self {
        self.iter_mut().for_each(|x| *x = T::mul_scalar(*x, factor));
        self
    }

    /// Exchange the contents and sizes of `self` and `other`.
    pub fn swap(&mut self, other: &mut Self) {
        let n = self.size.max(other.size);
        self.storage.0[..n].swap_with_slice(&mut other.storage.0[..n]);
        std::mem::swap(&mut self.size, &mut other.size);
    }

    /// Reinterpret as a vector of the opposite orientation.
    pub fn transpose(self) -> HybridVector<T, N, NN, TF::Transposed> {
        HybridVector {
            storage: self.storage,
            size: self.size,
            orientation: PhantomData,
        }
    }

    //------------//
    // Assignment //
    //------------//

    /// Replace the contents with `array`, taking its length as the new size.
    ///
    /// Arrays longer than `N` fail to compile.
    ///
    /// ```compile_fail
    /// let mut v = <hybrid_vector::hybrid!(i32, 2)>::new();
    /// v.assign_array([1, 2, 3]);
    /// ```
    pub fn assign_array<const M: usize>(&mut self, array: [T; M]) {
        let () = Fits::<M, N>::CHECK;
        self.set_size(M);
        self.as_mut_slice().copy_from_slice(&array);
    }

    /// Replace the contents with the value of `rhs`.
    ///
    /// Fails without modifying `self` if `rhs` is longer than `N`.
    #[track_caller]
    pub fn try_assign<R>(&mut self, rhs: &R) -> Result<(), InvalidSize>
    where
        R: Operand<Element = T, Orientation = TF> + ?Sized,
    {
        InvalidSize::check(rhs.size(), N)?;
        if rhs.can_alias(self.region()) {
            tracked_trace!("assigning aliased operand through a temporary");
            let mut tmp = Self::evaluated(rhs);
            self.swap(&mut tmp);
        } else {
            self.assign_unaliased(rhs);
        }
        Ok(())
    }

    fn assign_unaliased<R>(&mut self, rhs: &R)
    where
        R: Operand<Element = T, Orientation = TF> + ?Sized,
    {
        self.set_size(rhs.size());
        if R::SPARSE {
            self.reset();
        }
        rhs.apply(op::Replace, self.target());
    }

    /// Add `rhs` element-wise.
    ///
    /// Fails without modifying `self` if the sizes differ.
    #[track_caller]
    pub fn try_add_assign<R>(&mut self, rhs: &R) -> Result<(), SizeMismatch>
    where
        R: Operand<Element = T, Orientation = TF> + ?Sized,
    {
        self.compound(op::Add, rhs)
    }

    /// Subtract `rhs` element-wise.
    ///
    /// Fails without modifying `self` if the sizes differ.
    #[track_caller]
    pub fn try_sub_assign<R>(&mut self, rhs: &R) -> Result<(), SizeMismatch>
    where
        R: Operand<Element = T, Orientation = TF> + ?Sized,
    {
        self.compound(op::Sub, rhs)
    }

    #[track_caller]
    fn compound<Op, R>(&mut self, op: Op, rhs: &R) -> Result<(), SizeMismatch>
    where
        Op: AssignOp<T>,
        R: Operand<Element = T, Orientation = TF> + ?Sized,
    {
        SizeMismatch::check(self.size, rhs.size())?;
        Guarded::new(rhs, self.region()).apply(op, self.target());
        Ok(())
    }

    /// Multiply by `rhs` element-wise.
    ///
    /// For sparse operands, every position absent from `rhs` becomes zero.
    ///
    /// Fails without modifying `self` if the sizes differ.
    #[track_caller]
    pub fn try_mul_assign<R>(&mut self, rhs: &R) -> Result<(), SizeMismatch>
    where
        R: Operand<Element = T, Orientation = TF> + ?Sized,
    {
        SizeMismatch::check(self.size, rhs.size())?;
        let rhs = Guarded::new(rhs, self.region());
        if R::SPARSE || rhs.is_materialized() {
            tracked_trace!("multiplying through a temporary of size {}", self.size);
            let mut product = self.clone();
            rhs.apply(op::Mul, product.target());
            self.assign_unaliased(&product);
        } else {
            rhs.apply(op::Mul, self.target());
        }
        Ok(())
    }

    fn target(&mut self) -> Target<'_, T> {
        Target::new(&mut self.storage.0, self.size)
    }
}

///////////////////////
// Operand Protocols //
///////////////////////

impl<T, const N: usize, const NN: usize, TF> Operand for HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    type Element = T;
    type Orientation = TF;
    type Result = Self;

    fn size(&self) -> usize {
        self.size
    }

    fn can_alias(&self, region: Region) -> bool {
        self.region().overlaps(region)
    }

    fn evaluate(&self) -> Self {
        self.clone()
    }

    fn apply<Op: AssignOp<T>>(&self, op: Op, dst: Target<'_, T>) {
        engine::dense(op, self, dst)
    }
}

impl<T, const N: usize, const NN: usize, TF> DenseOperand for HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    const VECTORIZABLE: bool = T::VECTORIZABLE;

    #[inline(always)]
    fn at(&self, i: usize) -> T {
        self[i]
    }

    #[inline(always)]
    unsafe fn load<A: Architecture>(&self, arch: A, i: usize) -> T::Register<A> {
        // SAFETY: The caller guarantees `i < size <= N <= NN` and that `i` is a multiple of
        // `LANES`.
        unsafe { HybridVector::load(self, arch, i) }
    }
}

/////////////////////
// Std Trait Impls //
/////////////////////

impl<T, const N: usize, const NN: usize, TF> Default for HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize, const NN: usize, TF> std::fmt::Debug for HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridVector")
            .field("size", &self.size)
            .field("max_size", &N)
            .field("orientation", &TF::default())
            .field("data", &self.as_slice())
            .finish()
    }
}

impl<T, const N: usize, const NN: usize, TF, const M: usize> From<[T; M]>
    for HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    /// Literals longer than `N` fail to compile.
    ///
    /// ```compile_fail
    /// type V = hybrid_vector::hybrid!(u8, 3);
    /// let v = V::from([1, 2, 3, 4]);
    /// ```
    fn from(array: [T; M]) -> Self {
        let mut this = Self::new();
        this.assign_array(array);
        this
    }
}

impl<T, const N: usize, const NN: usize, TF, R> PartialEq<R> for HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
    R: DenseOperand<Element = T, Orientation = TF> + ?Sized,
{
    fn eq(&self, other: &R) -> bool {
        self.size == other.size() && self.iter().enumerate().all(|(i, x)| *x == other.at(i))
    }
}

impl<T, const N: usize, const NN: usize, TF> Index<usize> for HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        debug_assert!(i < self.size, "index {} out of range for size {}", i, self.size);
        &self.storage.0[i]
    }
}

impl<T, const N: usize, const NN: usize, TF> IndexMut<usize> for HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        debug_assert!(i < self.size, "index {} out of range for size {}", i, self.size);
        &mut self.storage.0[i]
    }
}

impl<T, const N: usize, const NN: usize, TF> MulAssign<T> for HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    fn mul_assign(&mut self, factor: T) {
        self.scale(factor);
    }
}

impl<T, const N: usize, const NN: usize, TF> DivAssign<T> for HybridVector<T, N, NN, TF>
where
    T: Element + Div<Output = T>,
    TF: Orientation,
{
    fn div_assign(&mut self, divisor: T) {
        debug_assert!(divisor != T::default(), "division by zero");
        self.iter_mut().for_each(|x| *x = *x / divisor);
    }
}

impl<'a, T, const N: usize, const NN: usize, TF> IntoIterator for &'a HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const N: usize, const NN: usize, TF> IntoIterator
    for &'a mut HybridVector<T, N, NN, TF>
where
    T: Element,
    TF: Orientation,
{
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

////////////////////
// Free Functions //
////////////////////

/// Set every element of `v` to the default value. See [`HybridVector::reset`].
pub fn reset<T, const N: usize, const NN: usize, TF>(v: &mut HybridVector<T, N, NN, TF>)
where
    T: Element,
    TF: Orientation,
{
    v.reset()
}

/// Set the size of `v` to zero. See [`HybridVector::clear`].
pub fn clear<T, const N: usize, const NN: usize, TF>(v: &mut HybridVector<T, N, NN, TF>)
where
    T: Element,
    TF: Orientation,
{
    v.clear()
}

/// Return `true` if `v` is in its default state, which is having size zero.
pub fn is_default<T, const N: usize, const NN: usize, TF>(v: &HybridVector<T, N, NN, TF>) -> bool
where
    T: Element,
    TF: Orientation,
{
    v.size() == 0
}

/// Exchange the contents of `a` and `b`. See [`HybridVector::swap`].
pub fn swap<T, const N: usize, const NN: usize, TF>(
    a: &mut HybridVector<T, N, NN, TF>,
    b: &mut HybridVector<T, N, NN, TF>,
) where
    T: Element,
    TF: Orientation,
{
    a.swap(b)
}

///////////
// Tests //
///////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{hybrid, Row};

    type V4 = hybrid!(i32, 4);
    type F6 = hybrid!(f32, 6);

    /// Every element past the logical size must be zero.
    fn padding_is_zero<T: Element, const N: usize, const NN: usize, TF: Orientation>(
        v: &HybridVector<T, N, NN, TF>,
    ) -> bool {
        v.storage.0[v.size..].iter().all(|x| *x == T::default())
    }

    #[rstest]
    fn construction_sizes(#[values(0, 1, 3, 4)] n: usize) {
        let v = V4::with_size(n).unwrap();
        assert_eq!(v.size(), n);
        assert_eq!(v.capacity(), 8);
        assert!(v.capacity() >= V4::MAX_SIZE);
        assert_eq!(v.non_zeros(), 0);
        assert!(padding_is_zero(&v));
    }

    #[test]
    fn construction_too_large() {
        let err = V4::with_size(5).unwrap_err();
        assert_eq!(err.requested(), 5);
        assert_eq!(err.capacity(), 4);

        assert!(V4::filled(5, 1).is_err());
        assert!(V4::from_slice(&[1, 2, 3, 4, 5]).is_err());
        assert!(V4::try_from_operand(&vec![0; 6]).is_err());
    }

    #[test]
    fn constructors() {
        let v = V4::filled(3, 7).unwrap();
        assert_eq!(v, [7, 7, 7]);
        assert!(padding_is_zero(&v));

        let v = V4::from_slice(&[4, 5]).unwrap();
        assert_eq!(v, [4, 5]);

        let data = [9, 8, 7, 6, 5];
        // SAFETY: `data` holds at least 3 elements.
        let v = unsafe { V4::from_ptr(3, data.as_ptr()) }.unwrap();
        assert_eq!(v, [9, 8, 7]);
        assert!(padding_is_zero(&v));

        let v = V4::from([1, 2]);
        assert_eq!(v.size(), 2);
        assert_eq!(v, [1, 2]);

        let v = V4::default();
        assert!(v.is_empty());
        assert!(is_default(&v));
    }

    #[test]
    fn conversion_from_operand() {
        let v = F6::try_from_operand(&[0.5f32, 1.5, 2.5, 3.5, 4.5]).unwrap();
        assert_eq!(v, [0.5, 1.5, 2.5, 3.5, 4.5]);
        assert!(padding_is_zero(&v));

        let w = F6::try_from_operand(&v).unwrap();
        assert_eq!(w, v);
    }

    #[test]
    fn resize_shrink_zeroes() {
        let mut v = V4::from([1, 2, 3, 4]);
        v.resize(1, true).unwrap();
        assert_eq!(v, [1]);
        assert!(padding_is_zero(&v));

        v.resize(4, true).unwrap();
        assert_eq!(v, [1, 0, 0, 0]);

        // Idempotent.
        v.resize(4, false).unwrap();
        assert_eq!(v, [1, 0, 0, 0]);
    }

    #[test]
    fn resize_failure_leaves_vector() {
        let mut v = V4::from([1, 2, 3]);
        assert!(v.resize(5, true).is_err());
        assert_eq!(v, [1, 2, 3]);

        assert!(v.extend(2, true).is_err());
        assert!(v.extend(usize::MAX, true).is_err());
        assert_eq!(v, [1, 2, 3]);

        v.extend(1, true).unwrap();
        assert_eq!(v.size(), 4);
    }

    #[test]
    fn clear_and_reset() {
        let mut v = V4::from([1, 2, 3]);
        v.reset();
        assert_eq!(v.size(), 3);
        assert_eq!(v.non_zeros(), 0);

        let mut v = V4::from([1, 2, 3]);
        clear(&mut v);
        assert_eq!(v.size(), 0);
        assert!(padding_is_zero(&v));

        let mut v = V4::from([1, 0, 3]);
        assert_eq!(v.non_zeros(), 2);
        reset(&mut v);
        assert_eq!(v, [0, 0, 0]);
    }

    #[test]
    fn scale_and_divide() {
        let mut v = F6::from([1.0, -2.0, 4.0]);
        v.scale(2.0);
        assert_eq!(v, [2.0, -4.0, 8.0]);

        v *= 0.5;
        assert_eq!(v, [1.0, -2.0, 4.0]);

        v /= 2.0;
        assert_eq!(v, [0.5, -1.0, 2.0]);
        assert!(padding_is_zero(&v));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "division by zero")]
    fn divide_by_zero_asserts() {
        let mut v = F6::from([1.0]);
        v /= 0.0;
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn index_past_size_asserts() {
        let v = V4::from([1, 2]);
        let _ = v[2];
    }

    #[test]
    fn element_access() {
        let mut v = V4::from([1, 2, 3]);
        v[1] = 20;
        *v.get_mut(2).unwrap() = 30;
        assert_eq!(v.get(1), Some(&20));
        assert_eq!(v.get(3), None);
        assert_eq!(v.iter().copied().collect::<Vec<_>>(), [1, 20, 30]);

        for x in &mut v {
            *x += 1;
        }
        assert_eq!((&v).into_iter().sum::<i32>(), 54);
    }

    #[test]
    fn swap_is_self_inverse() {
        let mut a = V4::from([1, 2, 3]);
        let mut b = V4::from([9]);

        swap(&mut a, &mut b);
        assert_eq!(a, [9]);
        assert_eq!(b, [1, 2, 3]);
        assert!(padding_is_zero(&a));
        assert!(padding_is_zero(&b));

        swap(&mut a, &mut b);
        assert_eq!(a, [1, 2, 3]);
        assert_eq!(b, [9]);
    }

    #[test]
    fn assign_array_resizes() {
        let mut v = V4::from([1, 2, 3, 4]);
        v.assign_array([5, 6]);
        assert_eq!(v, [5, 6]);
        assert!(padding_is_zero(&v));
    }

    #[test]
    fn fill_keeps_size() {
        let mut v = V4::with_size(2).unwrap();
        v.fill(3);
        assert_eq!(v, [3, 3]);
        assert!(padding_is_zero(&v));
    }

    #[test]
    fn alignment_and_aliasing() {
        let v = F6::from([1.0, 2.0]);
        assert!(v.is_aligned());
        assert_eq!(v.data() as usize % 32, 0);

        assert!(v.can_alias(v.data()));
        assert!(v.is_aliased(&v[1]));
        let other = 0.0f32;
        assert!(!v.can_alias(&other));

        let boxed = Box::new(F6::from([1.0]));
        assert!(boxed.is_aligned());
    }

    #[test]
    fn transpose_keeps_contents() {
        let v = V4::from([1, 2, 3]);
        let t: hybrid!(i32, 4, Row) = v.transpose();
        assert_eq!(t.as_slice(), [1, 2, 3]);
        assert_eq!(t.transpose(), [1, 2, 3]);
    }

    #[test]
    fn block_access() {
        use diskann_wide::{arch::Scalar, SIMDVector};

        let arch = Scalar::new();
        let mut v = F6::from([1.0, 2.0, 3.0]);
        // SAFETY: `0` is the only block index of a vector with 8 slots.
        let block = unsafe { v.load(arch, 0) };
        assert_eq!(block.to_array(), [1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        let doubled = f32::add_block::<Scalar>(block, block);
        // SAFETY: The padding lanes of `doubled` are zero.
        unsafe { v.store::<Scalar>(0, doubled) };
        assert_eq!(v, [2.0, 4.0, 6.0]);
        assert!(padding_is_zero(&v));
    }

    #[test]
    fn debug_format() {
        let v = V4::from([1, 2]);
        assert_eq!(
            format!("{:?}", v),
            "HybridVector { size: 2, max_size: 4, orientation: Column, data: [1, 2] }"
        );
    }
}

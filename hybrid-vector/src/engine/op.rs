/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! The assignment kinds understood by the engine.

use diskann_wide::Architecture;

use super::Target;
use crate::Element;

mod sealed {
    pub trait Sealed {}
}

/// How an operand value is combined into a destination value.
pub trait AssignOp<T: Element>: sealed::Sealed + Copy + std::fmt::Debug + 'static {
    /// Name used in log messages.
    const NAME: &'static str;

    /// Whether the block form has hardware support for `T`.
    const VECTORIZED: bool;

    /// Whether the destination value is an input to the combination.
    const READS_DESTINATION: bool = true;

    /// Combine destination value `x` with operand value `y`.
    fn scalar(x: T, y: T) -> T;

    /// Combine a block of destination values with a block of operand values.
    fn block<A: Architecture>(x: T::Register<A>, y: T::Register<A>) -> T::Register<A>;

    /// Combine the `(index, value)` pairs of a sparse operand into `dst`.
    ///
    /// Positions not named by `entries` keep their values.
    fn scatter<I>(mut dst: Target<'_, T>, entries: I)
    where
        I: Iterator<Item = (usize, T)>,
    {
        let live = dst.as_mut_slice();
        for (i, y) in entries {
            live[i] = Self::scalar(live[i], y);
        }
    }
}

/// Overwrite the destination with the operand.
///
/// Sparse replacement only writes the nonzero positions. The caller zeroes the destination
/// first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Replace;

/// Element-wise `x + y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

/// Element-wise `x - y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sub;

/// Element-wise `x * y`.
///
/// Positions absent from a sparse operand are implicit zeros, so they become zero in the
/// destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mul;

impl sealed::Sealed for Replace {}
impl sealed::Sealed for Add {}
impl sealed::Sealed for Sub {}
impl sealed::Sealed for Mul {}

impl<T: Element> AssignOp<T> for Replace {
    const NAME: &'static str = "replace";
    const VECTORIZED: bool = true;
    const READS_DESTINATION: bool = false;

    #[inline(always)]
    fn scalar(_: T, y: T) -> T {
        y
    }

    #[inline(always)]
    fn block<A: Architecture>(_: T::Register<A>, y: T::Register<A>) -> T::Register<A> {
        y
    }
}

impl<T: Element> AssignOp<T> for Add {
    const NAME: &'static str = "add";
    const VECTORIZED: bool = T::SIMD_ADD;

    #[inline(always)]
    fn scalar(x: T, y: T) -> T {
        T::add_scalar(x, y)
    }

    #[inline(always)]
    fn block<A: Architecture>(x: T::Register<A>, y: T::Register<A>) -> T::Register<A> {
        T::add_block::<A>(x, y)
    }
}

impl<T: Element> AssignOp<T> for Sub {
    const NAME: &'static str = "sub";
    const VECTORIZED: bool = T::SIMD_SUB;

    #[inline(always)]
    fn scalar(x: T, y: T) -> T {
        T::sub_scalar(x, y)
    }

    #[inline(always)]
    fn block<A: Architecture>(x: T::Register<A>, y: T::Register<A>) -> T::Register<A> {
        T::sub_block::<A>(x, y)
    }
}

impl<T: Element> AssignOp<T> for Mul {
    const NAME: &'static str = "mul";
    const VECTORIZED: bool = T::SIMD_MUL;

    #[inline(always)]
    fn scalar(x: T, y: T) -> T {
        T::mul_scalar(x, y)
    }

    #[inline(always)]
    fn block<A: Architecture>(x: T::Register<A>, y: T::Register<A>) -> T::Register<A> {
        T::mul_block::<A>(x, y)
    }

    fn scatter<I>(mut dst: Target<'_, T>, entries: I)
    where
        I: Iterator<Item = (usize, T)>,
    {
        let live = dst.as_mut_slice();
        let snapshot = live.to_vec();
        live.fill(T::default());
        for (i, y) in entries {
            live[i] = T::mul_scalar(snapshot[i], y);
        }
    }
}

/// Kinds that combine two operands into a third. Used by the lazy expressions.
pub trait Arithmetic<T: Element>: AssignOp<T> {}

impl<T: Element> Arithmetic<T> for Add {}
impl<T: Element> Arithmetic<T> for Sub {}
impl<T: Element> Arithmetic<T> for Mul {}

///////////
// Tests //
///////////

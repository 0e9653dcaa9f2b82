/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! The assignment engine.
//!
//! [`dense`] walks every position of a [`DenseOperand`], either one element at a time or in
//! register-width blocks. The block path is taken when the element type is vectorizable,
//! the operand can produce blocks, and the operation has hardware support. All three are
//! associated constants, so the choice is made at compile time. The block kernel is a
//! [`Target2`] functor run through [`dispatch2`] so it is compiled for, and runs on, the
//! best instruction set available at runtime.
//!
//! [`sparse`] walks only the nonzero entries of a [`SparseOperand`].

use std::marker::PhantomData;

use diskann_wide::{
    arch::{dispatch2, Target2},
    Architecture,
};

use crate::{
    operand::{DenseOperand, SparseOperand},
    tracing::tracked_trace,
    Element,
};

pub mod op;
pub use op::{Arithmetic, AssignOp};

/// The destination of an assignment: a buffer and the number of its leading elements that
/// take part.
///
/// Elements past `size` are never written.
#[derive(Debug)]
pub struct Target<'a, T> {
    storage: &'a mut [T],
    size: usize,
}

impl<'a, T> Target<'a, T> {
    pub(crate) fn new(storage: &'a mut [T], size: usize) -> Self {
        debug_assert!(size <= storage.len());
        Self { storage, size }
    }

    /// The number of elements being assigned.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The elements being assigned.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.storage[..self.size]
    }
}

/// Combine every element of `rhs` into `dst`.
#[inline]
pub fn dense<Op, R>(_op: Op, rhs: &R, mut dst: Target<'_, R::Element>)
where
    Op: AssignOp<R::Element>,
    R: DenseOperand + ?Sized,
{
    debug_assert_eq!(rhs.size(), dst.size());
    if <R::Element as Element>::VECTORIZABLE && R::VECTORIZABLE && Op::VECTORIZED {
        tracked_trace!("vectorized dense {} over {} elements", Op::NAME, dst.size());
        dispatch2(Vectorized::<Op>::new(), dst, rhs)
    } else {
        tracked_trace!("scalar dense {} over {} elements", Op::NAME, dst.size());
        for (i, x) in dst.as_mut_slice().iter_mut().enumerate() {
            *x = Op::scalar(*x, rhs.at(i));
        }
    }
}

/// Combine the nonzero entries of `rhs` into `dst`.
#[inline]
pub fn sparse<Op, R>(_op: Op, rhs: &R, dst: Target<'_, R::Element>)
where
    Op: AssignOp<R::Element>,
    R: SparseOperand + ?Sized,
{
    debug_assert_eq!(rhs.size(), dst.size());
    tracked_trace!(
        "sparse {} of {} entries over {} elements",
        Op::NAME,
        rhs.nnz(),
        dst.size()
    );
    Op::scatter(dst, rhs.nonzeros())
}

/// The block kernel of [`dense`].
#[derive(Debug, Clone, Copy)]
struct Vectorized<Op>(PhantomData<Op>);

impl<Op> Vectorized<Op> {
    fn new() -> Self {
        Self(PhantomData)
    }
}

impl<'a, 'b, A, Op, R> Target2<A, (), Target<'a, R::Element>, &'b R> for Vectorized<Op>
where
    A: Architecture,
    Op: AssignOp<R::Element>,
    R: DenseOperand + ?Sized,
{
    #[inline(always)]
    fn run(self, arch: A, dst: Target<'a, R::Element>, rhs: &'b R) {
        let lanes = <R::Element as Element>::LANES;
        let size = dst.size;
        let ptr = dst.storage.as_mut_ptr();

        let mut i = 0;
        while i + lanes <= size {
            // SAFETY: `i + lanes <= size <= dst.storage.len()`, so the whole block is inside
            // the destination. `i < size == rhs.size()` and `i` is a multiple of `lanes`,
            // which is the contract of `load`.
            unsafe {
                let y = rhs.load(arch, i);
                let z = if Op::READS_DESTINATION {
                    Op::block::<A>(<R::Element as Element>::load_block(arch, ptr.add(i)), y)
                } else {
                    y
                };
                <R::Element as Element>::store_block::<A>(z, ptr.add(i));
            }
            i += lanes;
        }

        // The final partial block must not touch `[size, storage.len())`.
        if i < size {
            let rest = size - i;
            // SAFETY: `rest` elements starting at `i` are inside the destination, and the
            // masked accesses touch no more than that. `i` satisfies the contract of `load`
            // as above.
            unsafe {
                let y = rhs.load(arch, i);
                let z = if Op::READS_DESTINATION {
                    Op::block::<A>(
                        <R::Element as Element>::load_first(arch, ptr.add(i), rest),
                        y,
                    )
                } else {
                    y
                };
                <R::Element as Element>::store_first::<A>(z, ptr.add(i), rest);
            }
        }
    }
}

///////////
// Tests //
///////////

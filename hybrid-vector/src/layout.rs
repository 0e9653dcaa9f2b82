/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::marker::PhantomData;

use crate::Element;

/// The width in bytes of the registers used for vectorized assignment.
pub const REGISTER_BYTES: usize = 32;

/// Return `n` rounded up to the next multiple of the register lane count of `T`.
///
/// This is the physical length of the storage of a vector with maximum size `n`. For types
/// that are not vectorizable, the result is `n`.
///
/// ```
/// use hybrid_vector::padded_capacity;
///
/// assert_eq!(padded_capacity::<f32>(6), 8);
/// assert_eq!(padded_capacity::<f32>(16), 16);
/// assert_eq!(padded_capacity::<u8>(1), 32);
/// assert_eq!(padded_capacity::<f64>(7), 7);
/// ```
pub const fn padded_capacity<T: Element>(n: usize) -> usize {
    let width = T::LANES;
    n + ((width - (n % width)) % width)
}

/// Inline storage aligned to the register width.
#[derive(Debug, Clone, Copy)]
#[repr(C, align(32))]
pub(crate) struct Aligned<T, const NN: usize>(pub(crate) [T; NN]);

const _: () = assert!(std::mem::align_of::<Aligned<u8, 1>>() == REGISTER_BYTES);

/// Post-monomorphization checks on the capacities of a vector type.
pub(crate) struct Layout<T, const N: usize, const NN: usize>(PhantomData<T>);

impl<T: Element, const N: usize, const NN: usize> Layout<T, N, NN> {
    /// Referencing this constant fails compilation if `NN` is not the padded capacity of
    /// `N`. Use the `hybrid!` macro to spell the type.
    pub(crate) const CHECK: () = {
        assert!(
            NN == padded_capacity::<T>(N),
            "padded capacity must be `padded_capacity::<T>(N)`"
        );
        assert!(NN.is_multiple_of(T::LANES));
        assert!(NN >= N);
    };
}

/// Compile-time proof that a literal of length `M` fits a vector of capacity `N`.
pub(crate) struct Fits<const M: usize, const N: usize>;

impl<const M: usize, const N: usize> Fits<M, N> {
    pub(crate) const CHECK: () = assert!(M <= N, "literal is longer than the vector capacity");
}

///////////
// Tests //
///////////

/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Element types and their vector registers.
//!
//! Every element type names the register it is processed in for each
//! [`Architecture`]. Vectorizable types use a 256-bit `diskann_wide` vector, so their lane
//! count is `REGISTER_BYTES / size_of::<T>()`. Other types use themselves as a
//! single-lane "register" and are always processed by the scalar loops.

use std::{
    fmt::Debug,
    ops::{Add, Mul, Sub},
};

use diskann_wide::{Architecture, SIMDVector};
use half::f16;

use crate::layout::REGISTER_BYTES;

/// A scalar that can be stored in a [`crate::HybridVector`].
///
/// `Default::default()` must be the additive identity ("zero") for numeric types: it is the
/// value used to fill padding and vacated positions.
pub trait Element:
    Copy
    + Default
    + PartialEq
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + 'static
{
    /// The number of elements processed by one register operation. `1` for types that
    /// cannot be vectorized.
    const LANES: usize;

    /// Whether blocks of this type can be processed in registers at all.
    const VECTORIZABLE: bool = Self::LANES > 1;

    /// Numeric types guarantee that storage beyond the logical size holds `default()`.
    const NUMERIC: bool;

    /// Hardware support for block addition.
    const SIMD_ADD: bool;
    /// Hardware support for block subtraction.
    const SIMD_SUB: bool;
    /// Hardware support for block multiplication.
    const SIMD_MUL: bool;

    /// The register holding `LANES` elements on architecture `A`.
    type Register<A: Architecture>: Copy + Debug;

    /// Broadcast `value` to all lanes.
    fn splat<A: Architecture>(arch: A, value: Self) -> Self::Register<A>;

    /// Load `LANES` contiguous elements.
    ///
    /// # Safety
    ///
    /// A read of `LANES` elements starting at `ptr` must be valid.
    unsafe fn load_block<A: Architecture>(arch: A, ptr: *const Self) -> Self::Register<A>;

    /// Load the first `first` elements, setting the remaining lanes to zero.
    ///
    /// # Safety
    ///
    /// A read of `first.min(LANES)` elements starting at `ptr` must be valid.
    unsafe fn load_first<A: Architecture>(
        arch: A,
        ptr: *const Self,
        first: usize,
    ) -> Self::Register<A>;

    /// Store all `LANES` elements.
    ///
    /// # Safety
    ///
    /// A write of `LANES` elements starting at `ptr` must be valid.
    unsafe fn store_block<A: Architecture>(block: Self::Register<A>, ptr: *mut Self);

    /// Store only the first `first` elements. Memory after them is not accessed.
    ///
    /// # Safety
    ///
    /// A write of `first.min(LANES)` elements starting at `ptr` must be valid.
    unsafe fn store_first<A: Architecture>(block: Self::Register<A>, ptr: *mut Self, first: usize);

    fn add_block<A: Architecture>(x: Self::Register<A>, y: Self::Register<A>) -> Self::Register<A>;
    fn sub_block<A: Architecture>(x: Self::Register<A>, y: Self::Register<A>) -> Self::Register<A>;
    fn mul_block<A: Architecture>(x: Self::Register<A>, y: Self::Register<A>) -> Self::Register<A>;

    /// Scalar `x + y`. Must agree lane-for-lane with [`Element::add_block`]: the built-in
    /// integer types wrap instead of panicking on overflow.
    #[inline(always)]
    fn add_scalar(x: Self, y: Self) -> Self {
        x + y
    }

    /// Scalar `x - y`. Must agree lane-for-lane with [`Element::sub_block`].
    #[inline(always)]
    fn sub_scalar(x: Self, y: Self) -> Self {
        x - y
    }

    /// Scalar `x * y`. Must agree lane-for-lane with [`Element::mul_block`].
    #[inline(always)]
    fn mul_scalar(x: Self, y: Self) -> Self {
        x * y
    }
}

/// Integer registers wrap, so the scalar loops must as well.
macro_rules! scalar_combines {
    (plain) => {};
    (wrapping) => {
        #[inline(always)]
        fn add_scalar(x: Self, y: Self) -> Self {
            x.wrapping_add(y)
        }

        #[inline(always)]
        fn sub_scalar(x: Self, y: Self) -> Self {
            x.wrapping_sub(y)
        }

        #[inline(always)]
        fn mul_scalar(x: Self, y: Self) -> Self {
            x.wrapping_mul(y)
        }
    };
}

macro_rules! simd_element {
    (
        $T:ty,
        $V:ident,
        add: $add:literal,
        sub: $sub:literal,
        mul: $mul:literal,
        scalar: $scalar:ident
    ) => {
        impl Element for $T {
            const LANES: usize = REGISTER_BYTES / std::mem::size_of::<$T>();
            const NUMERIC: bool = true;
            const SIMD_ADD: bool = $add;
            const SIMD_SUB: bool = $sub;
            const SIMD_MUL: bool = $mul;

            type Register<A: Architecture> = A::$V;

            #[inline(always)]
            fn splat<A: Architecture>(arch: A, value: Self) -> A::$V {
                <A::$V as SIMDVector>::splat(arch, value)
            }

            #[inline(always)]
            unsafe fn load_block<A: Architecture>(arch: A, ptr: *const Self) -> A::$V {
                // SAFETY: Inherited from caller.
                unsafe { <A::$V as SIMDVector>::load_simd(arch, ptr) }
            }

            #[inline(always)]
            unsafe fn load_first<A: Architecture>(
                arch: A,
                ptr: *const Self,
                first: usize,
            ) -> A::$V {
                // SAFETY: Inherited from caller.
                unsafe { <A::$V as SIMDVector>::load_simd_first(arch, ptr, first) }
            }

            #[inline(always)]
            unsafe fn store_block<A: Architecture>(block: A::$V, ptr: *mut Self) {
                // SAFETY: Inherited from caller.
                unsafe { block.store_simd(ptr) }
            }

            #[inline(always)]
            unsafe fn store_first<A: Architecture>(block: A::$V, ptr: *mut Self, first: usize) {
                // SAFETY: Inherited from caller.
                unsafe { block.store_simd_first(ptr, first) }
            }

            #[inline(always)]
            fn add_block<A: Architecture>(x: A::$V, y: A::$V) -> A::$V {
                x + y
            }

            #[inline(always)]
            fn sub_block<A: Architecture>(x: A::$V, y: A::$V) -> A::$V {
                x - y
            }

            #[inline(always)]
            fn mul_block<A: Architecture>(x: A::$V, y: A::$V) -> A::$V {
                x * y
            }

            scalar_combines!($scalar);
        }
    };
}

simd_element!(f32, f32x8, add: true, sub: true, mul: true, scalar: plain);
simd_element!(i32, i32x8, add: true, sub: true, mul: true, scalar: wrapping);
simd_element!(u32, u32x8, add: true, sub: true, mul: true, scalar: wrapping);
simd_element!(i16, i16x16, add: true, sub: true, mul: true, scalar: wrapping);
simd_element!(u64, u64x4, add: true, sub: true, mul: false, scalar: wrapping);
simd_element!(i8, i8x32, add: true, sub: true, mul: false, scalar: wrapping);
simd_element!(u8, u8x32, add: true, sub: true, mul: false, scalar: wrapping);

/// Implement [`Element`] for a type that is processed one value at a time.
///
/// The type must be `Copy + Default + PartialEq + Debug` and closed under `+`, `-` and `*`.
/// Scalar combines use those operators directly. Pass `numeric: true` when `Default::default()` is a zero that may be used as padding.
///
/// ```
/// use std::ops::{Add, Mul, Sub};
///
/// #[derive(Debug, Default, Clone, Copy, PartialEq)]
/// struct Celsius(f64);
///
/// impl Add for Celsius {
///     type Output = Self;
///     fn add(self, o: Self) -> Self { Celsius(self.0 + o.0) }
/// }
/// impl Sub for Celsius {
///     type Output = Self;
///     fn sub(self, o: Self) -> Self { Celsius(self.0 - o.0) }
/// }
/// impl Mul for Celsius {
///     type Output = Self;
///     fn mul(self, o: Self) -> Self { Celsius(self.0 * o.0) }
/// }
///
/// hybrid_vector::scalar_element!(Celsius, numeric: true);
///
/// let v = <hybrid_vector::hybrid!(Celsius, 3)>::filled(2, Celsius(1.5)).unwrap();
/// assert_eq!(v.capacity(), 3);
/// ```
#[macro_export]
macro_rules! scalar_element {
    ($T:ty, numeric: $numeric:literal) => {
        impl $crate::Element for $T {
            const LANES: usize = 1;
            const NUMERIC: bool = $numeric;
            const SIMD_ADD: bool = false;
            const SIMD_SUB: bool = false;
            const SIMD_MUL: bool = false;

            type Register<A: $crate::Architecture> = $T;

            #[inline(always)]
            fn splat<A: $crate::Architecture>(_: A, value: Self) -> Self {
                value
            }

            #[inline(always)]
            unsafe fn load_block<A: $crate::Architecture>(_: A, ptr: *const Self) -> Self {
                // SAFETY: Inherited from caller.
                unsafe { ptr.read() }
            }

            #[inline(always)]
            unsafe fn load_first<A: $crate::Architecture>(
                _: A,
                ptr: *const Self,
                first: usize,
            ) -> Self {
                if first == 0 {
                    <$T as ::std::default::Default>::default()
                } else {
                    // SAFETY: Inherited from caller, `first >= 1`.
                    unsafe { ptr.read() }
                }
            }

            #[inline(always)]
            unsafe fn store_block<A: $crate::Architecture>(block: Self, ptr: *mut Self) {
                // SAFETY: Inherited from caller.
                unsafe { ptr.write(block) }
            }

            #[inline(always)]
            unsafe fn store_first<A: $crate::Architecture>(
                block: Self,
                ptr: *mut Self,
                first: usize,
            ) {
                if first != 0 {
                    // SAFETY: Inherited from caller, `first >= 1`.
                    unsafe { ptr.write(block) }
                }
            }

            #[inline(always)]
            fn add_block<A: $crate::Architecture>(x: Self, y: Self) -> Self {
                x + y
            }

            #[inline(always)]
            fn sub_block<A: $crate::Architecture>(x: Self, y: Self) -> Self {
                x - y
            }

            #[inline(always)]
            fn mul_block<A: $crate::Architecture>(x: Self, y: Self) -> Self {
                x * y
            }
        }
    };
}

// No 64-bit lanes for these in `diskann_wide`.
scalar_element!(f64, numeric: true);
scalar_element!(i64, numeric: true);
scalar_element!(f16, numeric: true);

///////////
// Tests //
///////////

#[cfg(test)]
mod tests {
    use diskann_wide::arch::Scalar;

    use super::*;

    fn lanes<T: Element>() -> (usize, bool) {
        (T::LANES, T::VECTORIZABLE)
    }

    #[test]
    fn lane_counts() {
        assert_eq!(lanes::<f32>(), (8, true));
        assert_eq!(lanes::<i32>(), (8, true));
        assert_eq!(lanes::<u32>(), (8, true));
        assert_eq!(lanes::<i16>(), (16, true));
        assert_eq!(lanes::<u64>(), (4, true));
        assert_eq!(lanes::<i8>(), (32, true));
        assert_eq!(lanes::<u8>(), (32, true));

        assert_eq!(lanes::<f64>(), (1, false));
        assert_eq!(lanes::<i64>(), (1, false));
        assert_eq!(lanes::<f16>(), (1, false));
    }

    #[test]
    fn lanes_match_registers() {
        // The declared lane count must agree with the register type for every element.
        fn check<T: Element, V: SIMDVector>() {
            assert_eq!(T::LANES, V::LANES, "{}", std::any::type_name::<T>());
        }
        check::<f32, <Scalar as Architecture>::f32x8>();
        check::<i32, <Scalar as Architecture>::i32x8>();
        check::<u32, <Scalar as Architecture>::u32x8>();
        check::<i16, <Scalar as Architecture>::i16x16>();
        check::<u64, <Scalar as Architecture>::u64x4>();
        check::<i8, <Scalar as Architecture>::i8x32>();
        check::<u8, <Scalar as Architecture>::u8x32>();
    }

    #[test]
    fn block_round_trip_with_partial_tail() {
        let arch = Scalar::new();
        let src: Vec<f32> = (1..=8).map(|i| i as f32).collect();
        let mut dst = [-1.0f32; 8];

        // SAFETY: Both buffers hold 8 elements.
        unsafe {
            let x = f32::load_first(arch, src.as_ptr(), 5);
            let y = f32::splat(arch, 2.0);
            f32::store_first::<Scalar>(f32::mul_block::<Scalar>(x, y), dst.as_mut_ptr(), 5);
        }
        assert_eq!(dst, [2.0, 4.0, 6.0, 8.0, 10.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn scalar_registers() {
        let arch = Scalar::new();
        let mut x = 3.0f64;

        // SAFETY: `x` is a valid single element.
        unsafe {
            assert_eq!(f64::load_first(arch, &x, 0), 0.0);
            let y = f64::load_block(arch, &x);
            f64::store_block::<Scalar>(f64::add_block::<Scalar>(y, y), &mut x);
            f64::store_first::<Scalar>(100.0, &mut x, 0);
        }
        assert_eq!(x, 6.0);
    }
}

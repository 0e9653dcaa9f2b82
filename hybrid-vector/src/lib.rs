/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
//! # hybrid-vector
//!
//! A dense vector with a compile-time maximum size and inline, register-aligned storage.
//!
//! [`HybridVector`] keeps its elements in a buffer padded up to a whole number of 256-bit
//! registers. Assignment and compound arithmetic from any [`Operand`] go through a small
//! engine that picks, at compile time, between
//!
//! * a vectorized kernel dispatched to the best instruction set available at runtime,
//! * a scalar loop, for element types or operations without hardware support, and
//! * a traversal of nonzero entries for sparse operands.
//!
//! Operands that may read the destination's own storage are evaluated into a temporary
//! first, so `v = f(v)` gives the same result as with a fresh vector.
//!
//! ```
//! use hybrid_vector::{hybrid, CompressedVector, Sum};
//!
//! let mut v = <hybrid!(f32, 4)>::from([1.0, 2.0]);
//! v *= 2.0;
//! assert_eq!(v, [2.0, 4.0]);
//!
//! v.try_add_assign(&Sum::new(&[0.5f32, 0.5], &[0.5f32, 0.5]).unwrap()).unwrap();
//! assert_eq!(v, [3.0, 5.0]);
//!
//! // Multiplying by a sparse operand zeroes every position it does not name.
//! let mask: CompressedVector<f32> = CompressedVector::try_from_entries(2, [(1, 10.0)]).unwrap();
//! v.try_mul_assign(&mask).unwrap();
//! assert_eq!(v, [0.0, 50.0]);
//!
//! assert!(v.resize(5, true).is_err());
//! assert_eq!(v.size(), 2);
//! ```

mod alias;
mod element;
pub mod engine;
mod error;
mod expr;
mod layout;
mod operand;
mod orientation;
mod sparse;
mod tracing;
mod vector;
mod view;

pub use alias::Region;
pub use diskann_wide::Architecture;
pub use element::Element;
pub use engine::Target;
pub use error::{Error, InvalidSize, SizeMismatch};
pub use expr::{Binary, Cast, Difference, Product, Scaled, Sum, Transpose};
pub use layout::{padded_capacity, REGISTER_BYTES};
pub use operand::{DenseOperand, Operand, SparseOperand};
pub use orientation::{Column, Orientation, Row};
pub use sparse::{CompressedVector, InvalidEntry};
pub use vector::{clear, is_default, reset, swap, HybridVector};
pub use view::{DynamicVector, RawView};

/// Spell the [`HybridVector`] type with maximum size `N`, computing the padded capacity.
///
/// ```
/// use hybrid_vector::{hybrid, Row};
///
/// let column = <hybrid!(u8, 5)>::with_size(5).unwrap();
/// assert_eq!(column.capacity(), 32);
///
/// let row = <hybrid!(f64, 5, Row)>::with_size(3).unwrap();
/// assert_eq!(row.capacity(), 5);
/// ```
#[macro_export]
macro_rules! hybrid {
    ($T:ty, $N:expr) => {
        $crate::HybridVector<$T, { $N }, { $crate::padded_capacity::<$T>($N) }>
    };
    ($T:ty, $N:expr, $TF:ty) => {
        $crate::HybridVector<$T, { $N }, { $crate::padded_capacity::<$T>($N) }, $TF>
    };
}

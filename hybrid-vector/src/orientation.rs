/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::fmt::Debug;

mod sealed {
    pub trait Sealed {}
}

/// Whether a vector is a column or a row vector.
///
/// Operands can only be assigned to destinations with the same orientation.
pub trait Orientation: sealed::Sealed + Debug + Default + Copy + PartialEq + 'static {
    /// The opposite orientation.
    type Transposed: Orientation<Transposed = Self>;

    /// `true` for row vectors.
    const ROW: bool;
}

/// Marker for column vectors. This is the default orientation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Column;

/// Marker for row vectors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Row;

impl sealed::Sealed for Column {}
impl sealed::Sealed for Row {}

impl Orientation for Column {
    type Transposed = Row;
    const ROW: bool = false;
}

impl Orientation for Row {
    type Transposed = Column;
    const ROW: bool = true;
}

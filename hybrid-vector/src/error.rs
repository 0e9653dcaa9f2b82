/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use thiserror::Error;

use crate::tracing::tracked_debug;

/// An operation would have grown a vector beyond its maximum capacity.
///
/// Returned before any element is written, so the vector that produced it is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("requested size {requested} exceeds the capacity {capacity}")]
pub struct InvalidSize {
    requested: usize,
    capacity: usize,
}

impl InvalidSize {
    /// Succeed if `requested` fits in `capacity`.
    #[track_caller]
    pub(crate) fn check(requested: usize, capacity: usize) -> Result<(), Self> {
        if requested <= capacity {
            Ok(())
        } else {
            tracked_debug!(
                "rejecting size {} for a vector of capacity {}",
                requested,
                capacity
            );
            Err(Self {
                requested,
                capacity,
            })
        }
    }

    /// The size that was asked for.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// The maximum size of the vector that rejected the request.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A compound operation was given an operand whose size differs from its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operand size {actual} does not match the vector size {expected}")]
pub struct SizeMismatch {
    expected: usize,
    actual: usize,
}

impl SizeMismatch {
    /// Succeed if `actual == expected`.
    #[track_caller]
    pub(crate) fn check(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            tracked_debug!(
                "rejecting operand of size {} against size {}",
                actual,
                expected
            );
            Err(Self { expected, actual })
        }
    }

    /// The size of the destination.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// The size of the offending operand.
    pub fn actual(&self) -> usize {
        self.actual
    }
}

/// Any error produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    InvalidSize(#[from] InvalidSize),
    #[error(transparent)]
    SizeMismatch(#[from] SizeMismatch),
}

///////////
// Tests //
///////////

/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Logging shims.
//!
//! `tracing::event!` records the `file!()` and `line!()` of the macro call site, which is
//! always inside this crate. The `tracked_*` macros attach the location of the
//! `#[track_caller]` entry point instead, under "hybrid_vector.file" and
//! "hybrid_vector.line".
//!
//! With the `tracing` feature disabled, the macros still type-check their format arguments
//! but emit nothing. Only plain format strings are accepted so both forms stay valid.

#[cfg(feature = "tracing")]
macro_rules! tracked_debug {
    ($($arg:tt)+) => {{
        let location = std::panic::Location::caller();
        ::tracing::debug!(
            hybrid_vector.file = location.file(),
            hybrid_vector.line = location.line(),
            $($arg)+
        );
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! tracked_debug {
    ($($arg:tt)+) => {{
        $crate::tracing::discard_args!($($arg)+);
    }};
}

#[cfg(feature = "tracing")]
macro_rules! tracked_trace {
    ($($arg:tt)+) => {{
        let location = std::panic::Location::caller();
        ::tracing::trace!(
            hybrid_vector.file = location.file(),
            hybrid_vector.line = location.line(),
            $($arg)+
        );
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! tracked_trace {
    ($($arg:tt)+) => {{
        $crate::tracing::discard_args!($($arg)+);
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! discard_args {
    ($($arg:tt)+) => {{
        let _ = format_args!($($arg)+);
    }};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use discard_args;
pub(crate) use {tracked_debug, tracked_trace};

///////////
// Tests //
///////////

// Run with and without the `tracing` feature: both expansions must accept the same input.
#[cfg(test)]
mod tests {
    #[test]
    fn macros_accept_format_arguments() {
        let (size, capacity) = (5, 4);
        tracked_debug!("rejecting size {} for a vector of capacity {}", size, capacity);
        tracked_trace!("plain message");
        tracked_trace!("named {value}", value = size + 1);
    }
}

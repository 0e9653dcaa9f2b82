/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

#![allow(dead_code)]

use hybrid_vector::{Element, HybridVector, Orientation};
use rand::{rngs::StdRng, Rng};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Install a subscriber for the current test thread, respecting `RUST_LOG`.
///
/// The returned guard uninstalls it when dropped, so test threads do not conflict.
pub fn init_test_subscriber() -> tracing::subscriber::DefaultGuard {
    let fmt_layer = fmt::layer().with_target(true).with_test_writer();

    let filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .set_default()
}

/// Convert a small integer into any element type.
pub fn small<T: TryFrom<u8>>(x: u8) -> T {
    T::try_from(x).unwrap_or_else(|_| panic!("{} is not representable", x))
}

/// `len` values drawn uniformly from `range`.
pub fn random_values<T: TryFrom<u8>>(
    rng: &mut StdRng,
    len: usize,
    range: std::ops::Range<u8>,
) -> Vec<T> {
    (0..len).map(|_| small(rng.random_range(range.clone()))).collect()
}

/// Return `true` if every storage slot past the logical size holds the default value.
pub fn padding_is_zero<T, const N: usize, const NN: usize, TF>(
    v: &HybridVector<T, N, NN, TF>,
) -> bool
where
    T: Element,
    TF: Orientation,
{
    (v.size()..v.capacity()).all(|i| {
        // SAFETY: The storage holds `capacity()` initialized elements.
        unsafe { v.data().add(i).read() == T::default() }
    })
}

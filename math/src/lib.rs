// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The [tiny-polar](https://github.com/tiny-polar/tiny-polar) numeric kernel.
//!
//! Provides the strong Q-format scalar, angle and Cartesian types the shader
//! engine is built on, together with their closed fixed-point arithmetic,
//! table-driven trigonometry, an `atan2` approximation, polar↔Cartesian
//! conversion and a 1D/2D value-noise sampler.
//!
//! Everything here is integer-only. There is no floating point anywhere in
//! this crate, which is the whole point: the target is a 32-bit
//! microcontroller without an FPU.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![allow(clippy::identity_op)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::upper_case_acronyms)]

#[cfg(feature = "std")]
extern crate std;

mod angle;
mod cartesian;
mod noise;
mod scalar;
mod uv;

pub use angle::*;
pub use cartesian::*;
pub use noise::*;
pub use scalar::*;
pub use uv::*;

/// Wall-clock milliseconds since boot.
///
/// Monotonic in normal operation; every time-delta computation in the engine
/// goes through a two's-complement subtraction so a wrap degrades gracefully.
pub type TimeMillis = u32;

/// Clamps `value` into `[min, max]`.
#[inline]
pub fn bound<T: Ord + Copy>(min: T, value: T, max: T) -> T {
    max.min(value).max(min)
}

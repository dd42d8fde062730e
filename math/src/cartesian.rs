// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use bytemuck::{Pod, Zeroable};

use crate::{
    atan2_turns_approx, bound, cos_q1_15, scale_i32_by_bounded, sin_q1_15, sqrt_u32, BoundedAngle,
    FracQ0_16, UnboundedAngle,
};

/// A Cartesian coordinate in signed Q24.8 fixed point.
///
/// 24 integer bits and 8 fractional bits; one "unit" is raw `256`. The
/// Cartesian plane fed to the noise source is this type, offset into the
/// unsigned domain at the source boundary.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Pod, Zeroable)]
pub struct CartQ24_8(i32);

impl CartQ24_8 {
    /// The number of fractional bits.
    pub const FRAC_BITS: u32 = 8;
    /// 0.0.
    pub const ZERO: Self = CartQ24_8(0);
    /// 1.0.
    pub const ONE: Self = CartQ24_8(1 << 8);

    /// Creates a coordinate from its raw Q24.8 representation.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        CartQ24_8(raw)
    }

    /// Creates a coordinate from a whole number of units.
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        CartQ24_8(n << 8)
    }

    /// Returns the raw Q24.8 value.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Converts a polar coordinate to signed Cartesian space.
///
/// The phase must have been promoted from a [`BoundedAngle`]
/// (`angle.to_phase()`); the trig sample uses only its high 16 bits.
/// Output components lie in `[-32767, 32767]` scaled by `radius`.
pub fn polar_to_cartesian(phase: UnboundedAngle, radius: FracQ0_16) -> (i32, i32) {
    let angle = phase.to_angle();
    let cos = cos_q1_15(angle);
    let sin = sin_q1_15(angle);
    let x = scale_i32_by_bounded(cos.get() as i32, radius);
    let y = scale_i32_by_bounded(sin.get() as i32, radius);
    (x, y)
}

/// Converts a signed Cartesian coordinate back to polar space.
///
/// Inputs are clamped to the `i16` range first. The origin maps to
/// `(phase 0, radius 0)`. The radius is normalized so that magnitude 32767
/// becomes [`FracQ0_16::MAX`].
pub fn cartesian_to_polar(x: i32, y: i32) -> (UnboundedAngle, FracQ0_16) {
    let x16 = bound(i16::MIN as i32, x, i16::MAX as i32) as i16;
    let y16 = bound(i16::MIN as i32, y, i16::MAX as i32) as i16;

    let angle = atan2_turns_approx(y16, x16);
    let phase = angle.to_phase();

    let dx = x16 as i32;
    let dy = y16 as i32;
    let radius_squared = (dx * dx) as u32 + (dy * dy) as u32;
    let magnitude = sqrt_u32(radius_squared);
    let mut radius_raw = ((magnitude as u32) << 16) / 32767;
    if radius_raw > 0xFFFF {
        radius_raw = 0xFFFF;
    }

    (phase, FracQ0_16::from_raw(radius_raw as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angular_distance(a: u16, b: u16) -> u16 {
        let d = a.wrapping_sub(b);
        d.min(0u16.wrapping_sub(d))
    }

    #[test]
    fn origin_is_stable() {
        let (phase, radius) = cartesian_to_polar(0, 0);
        assert_eq!(phase, UnboundedAngle::ZERO);
        assert_eq!(radius, FracQ0_16::ZERO);
    }

    #[test]
    fn axes_round_trip() {
        let r = FracQ0_16::HALF;
        let (x, y) = polar_to_cartesian(BoundedAngle::ZERO.to_phase(), r);
        assert!(y.abs() < 64);
        assert!((x - 16384).abs() < 64);

        let (x, y) = polar_to_cartesian(BoundedAngle::QUARTER.to_phase(), r);
        assert!(x.abs() < 64);
        assert!((y - 16384).abs() < 64);
    }

    #[test]
    fn polar_round_trip_is_bounded() {
        // Radius between 0.1 and 0.9, a spread of angles: the reconstruction
        // must be within 0.01 turn and 3% relative radius.
        for &angle_raw in &[0u16, 3000, 9000, 17000, 30000, 41000, 52000, 63000] {
            for &radius_raw in &[6554u16, 16384, 32768, 49152, 58982] {
                let angle = BoundedAngle::from_raw(angle_raw);
                let radius = FracQ0_16::from_raw(radius_raw);
                let (x, y) = polar_to_cartesian(angle.to_phase(), radius);
                let (phase, r_out) = cartesian_to_polar(x, y);

                let angle_err = angular_distance(phase.to_angle().get(), angle_raw);
                assert!(angle_err < 656, "angle {}: err {}", angle_raw, angle_err);

                let r_err = (r_out.get() as i32 - radius_raw as i32).abs();
                assert!(
                    r_err <= radius_raw as i32 * 3 / 100 + 2,
                    "radius {}: got {}",
                    radius_raw,
                    r_out.get()
                );
            }
        }
    }
}

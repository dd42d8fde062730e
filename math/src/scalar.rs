// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use bytemuck::{Pod, Zeroable};

use crate::bound;

/// An unsigned fraction in Q0.16 format.
///
/// Raw `0` is 0.0 and raw `0xFFFF` is the value closest to 1.0. Used for
/// alphas, unsigned scale factors and anywhere a negative value would be
/// semantically invalid.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Pod, Zeroable)]
pub struct FracQ0_16(u16);

impl FracQ0_16 {
    /// 0.0.
    pub const ZERO: Self = FracQ0_16(0);
    /// 0.5.
    pub const HALF: Self = FracQ0_16(0x8000);
    /// The value closest to 1.0.
    pub const MAX: Self = FracQ0_16(0xFFFF);

    /// Creates a fraction from its raw Q0.16 representation.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        FracQ0_16(raw)
    }

    /// Creates a fraction from `numerator / denominator` without floats.
    ///
    /// Saturates at [`FracQ0_16::MAX`]. A zero denominator yields zero.
    pub const fn from_ratio(numerator: u32, denominator: u32) -> Self {
        if numerator == 0 || denominator == 0 {
            return FracQ0_16(0);
        }
        let raw = (0xFFFF_u64 * numerator as u64) / denominator as u64;
        if raw > 0xFFFF {
            FracQ0_16(0xFFFF)
        } else {
            FracQ0_16(raw as u16)
        }
    }

    /// Creates a fraction from per-mil units (`500` is 0.5).
    pub const fn from_per_mil(per_mil: u16) -> Self {
        Self::from_ratio(per_mil as u32, 1000)
    }

    /// Returns the raw Q0.16 value.
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Remaps `[0, 1]` to the signed `[-1, 1]` domain.
    #[inline]
    pub const fn to_signed(self) -> SFracQ0_16 {
        SFracQ0_16((self.0 as i32 - 0x8000) << 1)
    }
}

/// A signed fraction in Q0.16 format, stored in a 32-bit container.
///
/// Raw `65536` is 1.0 and raw `-65536` is -1.0. This is the canonical signal
/// value: oscillators, easings and ranges all speak it.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Pod, Zeroable)]
pub struct SFracQ0_16(i32);

impl SFracQ0_16 {
    /// -1.0.
    pub const MIN: Self = SFracQ0_16(-65536);
    /// 0.0.
    pub const ZERO: Self = SFracQ0_16(0);
    /// 1.0.
    pub const ONE: Self = SFracQ0_16(65536);

    /// Creates a signed fraction from its raw representation.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        SFracQ0_16(raw)
    }

    /// Creates a signed fraction from `numerator / denominator` without floats.
    pub const fn from_ratio(numerator: i32, denominator: i32) -> Self {
        if numerator == 0 || denominator == 0 {
            return SFracQ0_16(0);
        }
        let raw = (numerator as i64 * 65536) / denominator as i64;
        SFracQ0_16(clamp_i64_to_i32(raw))
    }

    /// Creates a signed fraction from per-mil units (`-500` is -0.5).
    pub const fn from_per_mil(per_mil: i32) -> Self {
        Self::from_ratio(per_mil, 1000)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Remaps `[-1, 1]` to the unsigned `[0, 1]` domain, clamping outliers.
    #[inline]
    pub fn to_unit(self) -> FracQ0_16 {
        FracQ0_16(bound(0, (self.0 >> 1) + 0x8000, 0xFFFF) as u16)
    }

    /// Returns `|self|` clamped to [`FracQ0_16::MAX`].
    ///
    /// This is the "amount of this effect" interpretation used by
    /// unsigned-from-signed range mapping.
    #[inline]
    pub fn magnitude(self) -> FracQ0_16 {
        let abs = if self.0 == i32::MIN {
            i32::MAX
        } else {
            self.0.abs()
        };
        FracQ0_16(bound(0, abs, 0xFFFF) as u16)
    }

    /// Q0.16 × Q0.16 with symmetric rounding, saturating at ±[`i32`] range.
    #[inline]
    pub fn mul_sat(self, other: SFracQ0_16) -> SFracQ0_16 {
        SFracQ0_16(mul_q16_16_sat(self.0, other.0))
    }

    /// Q0.16 × Q0.16 with symmetric rounding, wrapping modulo 2^32.
    #[inline]
    pub fn mul_wrap(self, other: SFracQ0_16) -> SFracQ0_16 {
        SFracQ0_16(mul_q16_16_wrap(self.0, other.0))
    }
}

/// A signed Q16.16 fixed-point value.
///
/// 16 integer bits, 16 fractional bits; raw `65536` is 1.0. Used for UV
/// coordinates and motion offsets that may exceed 1.0 (tiling, zoom).
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Pod, Zeroable)]
pub struct FracQ16_16(i32);

impl FracQ16_16 {
    /// 0.0.
    pub const ZERO: Self = FracQ16_16(0);
    /// 1.0.
    pub const ONE: Self = FracQ16_16(1 << 16);

    /// Creates a value from its raw Q16.16 representation.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        FracQ16_16(raw)
    }

    /// Creates a value from a whole number.
    #[inline]
    pub const fn from_int(n: i16) -> Self {
        FracQ16_16((n as i32) << 16)
    }

    /// Returns the raw Q16.16 value.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Q16.16 × Q16.16 with symmetric rounding, saturating.
    #[inline]
    pub fn mul_sat(self, other: FracQ16_16) -> FracQ16_16 {
        FracQ16_16(mul_q16_16_sat(self.0, other.0))
    }

    /// Two's-complement wrapping add.
    #[inline]
    pub fn add_wrap(self, other: FracQ16_16) -> FracQ16_16 {
        FracQ16_16(add_wrap_q16_16(self.0, other.0))
    }
}

#[inline]
const fn clamp_i64_to_i32(v: i64) -> i32 {
    if v > i32::MAX as i64 {
        i32::MAX
    } else if v < i32::MIN as i64 {
        i32::MIN
    } else {
        v as i32
    }
}

/// Scales a signed 32-bit value by an unsigned Q0.16 fraction.
///
/// Rounds symmetrically away from zero and saturates at the `i32` range.
/// `scale == FracQ0_16::MAX` is an exact identity.
#[inline]
pub fn scale_i32_by_bounded(value: i32, scale: FracQ0_16) -> i32 {
    let scale_raw = scale.get();
    if scale_raw == 0xFFFF {
        return value;
    }
    let mut result = value as i64 * scale_raw as i64;
    result += if result >= 0 { 0x8000 } else { -0x8000 };
    // Truncating division, not a shift: an arithmetic shift would floor
    // negative values and break the symmetry around zero.
    result /= 1 << 16;
    clamp_i64_to_i32(result)
}

/// Q16.16 × Q16.16 multiply with symmetric rounding, saturating.
#[inline]
pub fn mul_q16_16_sat(a: i32, b: i32) -> i32 {
    let mut result = a as i64 * b as i64;
    result += if result >= 0 { 0x8000 } else { -0x8000 };
    result /= 1 << 16;
    clamp_i64_to_i32(result)
}

/// Q16.16 × Q16.16 multiply with symmetric rounding, wrapping modulo 2^32.
///
/// The ±0x8000 bias plus truncating division rounds half away from zero on
/// both sides; the final cast is a well-defined two's-complement wrap.
#[inline]
pub fn mul_q16_16_wrap(a: i32, b: i32) -> i32 {
    let mut result = a as i64 * b as i64;
    result += if result >= 0 { 1 << 15 } else { -(1 << 15) };
    result /= 1 << 16;
    result as u32 as i32
}

/// Two's-complement wrapping add of two raw Q16.16 values.
#[inline]
pub fn add_wrap_q16_16(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// Clamps a 64-bit raw Q16.16 intermediate back into the `i32` container.
#[inline]
pub fn clamp_q16_16_raw(raw: i64) -> i32 {
    clamp_i64_to_i32(raw)
}

/// Integer square root, clamped to the `u16` range.
pub fn sqrt_u32(value: u32) -> u16 {
    let mut op = value;
    let mut res: u32 = 0;
    let mut one: u32 = 1 << 30;

    while one > op {
        one >>= 2;
    }

    while one != 0 {
        if op >= res + one {
            op -= res + one;
            res = (res >> 1) + one;
        } else {
            res >>= 1;
        }
        one >>= 2;
    }

    if res > u16::MAX as u32 {
        u16::MAX
    } else {
        res as u16
    }
}

/// Integer square root of a 64-bit value.
pub fn sqrt_u64(value: u64) -> u64 {
    let mut op = value;
    let mut res: u64 = 0;
    let mut one: u64 = 1 << 62;

    while one > op {
        one >>= 2;
    }

    while one != 0 {
        if op >= res + one {
            op -= res + one;
            res = (res >> 1) + one;
        } else {
            res >>= 1;
        }
        one >>= 2;
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_by_max_is_identity() {
        for v in [0, 1, -1, 12345, -12345, i32::MAX, i32::MIN] {
            assert_eq!(scale_i32_by_bounded(v, FracQ0_16::MAX), v);
        }
    }

    #[test]
    fn scale_rounds_symmetrically() {
        let scale = FracQ0_16::from_raw(0x1234);
        for v in [1, 7, 1000, 65535, 123_456_789] {
            assert_eq!(
                scale_i32_by_bounded(v, scale),
                -scale_i32_by_bounded(-v, scale)
            );
        }
    }

    #[test]
    fn scale_by_half() {
        assert_eq!(scale_i32_by_bounded(1000, FracQ0_16::HALF), 500);
        assert_eq!(scale_i32_by_bounded(-1000, FracQ0_16::HALF), -500);
    }

    #[test]
    fn mul_sat_saturates() {
        assert_eq!(mul_q16_16_sat(i32::MAX, i32::MAX), i32::MAX);
        assert_eq!(mul_q16_16_sat(i32::MAX, i32::MIN), i32::MIN);
        assert_eq!(mul_q16_16_sat(1 << 16, 1 << 16), 1 << 16);
    }

    #[test]
    fn mul_wrap_wraps() {
        // (2^15)^2 in Q16.16 is 2^30, still in range.
        assert_eq!(mul_q16_16_wrap(1 << 20, 1 << 20), 1 << 24);
        // Identity via ONE.
        assert_eq!(mul_q16_16_wrap(424242, 1 << 16), 424242);
    }

    #[test]
    fn add_wrap_is_modular() {
        assert_eq!(add_wrap_q16_16(i32::MAX, 1), i32::MIN);
        assert_eq!(add_wrap_q16_16(5, -7), -2);
    }

    #[test]
    fn ratio_constructors() {
        assert_eq!(FracQ0_16::from_ratio(1, 2).get(), 0x7FFF);
        assert_eq!(FracQ0_16::from_ratio(3, 2), FracQ0_16::MAX);
        assert_eq!(SFracQ0_16::from_ratio(1, 4).get(), 16384);
        assert_eq!(SFracQ0_16::from_per_mil(-500).get(), -32768);
    }

    #[test]
    fn unit_signed_remaps() {
        assert_eq!(FracQ0_16::ZERO.to_signed().get(), -65536);
        assert_eq!(FracQ0_16::HALF.to_signed().get(), 0);
        assert_eq!(SFracQ0_16::ZERO.to_unit(), FracQ0_16::HALF);
        assert_eq!(SFracQ0_16::MIN.to_unit(), FracQ0_16::ZERO);
        assert_eq!(SFracQ0_16::ONE.magnitude(), FracQ0_16::MAX);
        assert_eq!(SFracQ0_16::from_raw(-16384).magnitude().get(), 16384);
    }

    #[test]
    fn sqrt_values() {
        assert_eq!(sqrt_u32(0), 0);
        assert_eq!(sqrt_u32(1), 1);
        assert_eq!(sqrt_u32(65536), 256);
        assert_eq!(sqrt_u32(u32::MAX), u16::MAX);
        assert_eq!(sqrt_u64(1 << 32), 1 << 16);
        assert_eq!(sqrt_u64(144), 12);
    }
}

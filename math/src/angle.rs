// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use bytemuck::{Pod, Zeroable};

use crate::SFracQ0_16;

/// An angle expressed as a fraction of a full turn, quantized to 16 bits.
///
/// The domain is `[0, 1)` turns: raw `0x4000` is a quarter turn, and
/// arithmetic wraps at 2^16.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Pod, Zeroable)]
pub struct BoundedAngle(u16);

impl BoundedAngle {
    /// 0 turns.
    pub const ZERO: Self = BoundedAngle(0);
    /// 1/4 turn (90°).
    pub const QUARTER: Self = BoundedAngle(0x4000);
    /// 1/2 turn (180°).
    pub const HALF: Self = BoundedAngle(0x8000);
    /// 3/4 turn (270°).
    pub const THREE_QUARTERS: Self = BoundedAngle(0xC000);

    /// Creates an angle from its raw turn-fraction representation.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        BoundedAngle(raw)
    }

    /// Creates an angle from `numerator / denominator` of a full turn.
    pub const fn from_turn_ratio(numerator: u32, denominator: u32) -> Self {
        if numerator == 0 || denominator == 0 {
            return BoundedAngle(0);
        }
        let raw = ((numerator as u64) << 16) / denominator as u64;
        BoundedAngle(raw as u16)
    }

    /// Returns the raw turn fraction.
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Wrapping angular addition.
    #[inline]
    pub const fn wrapping_add(self, other: BoundedAngle) -> BoundedAngle {
        BoundedAngle(self.0.wrapping_add(other.0))
    }

    /// Wrapping angular subtraction.
    #[inline]
    pub const fn wrapping_sub(self, other: BoundedAngle) -> BoundedAngle {
        BoundedAngle(self.0.wrapping_sub(other.0))
    }

    /// Promotes the angle into phase space (the high 16 bits of a
    /// [`UnboundedAngle`]). The only defined conversion between the two.
    #[inline]
    pub const fn to_phase(self) -> UnboundedAngle {
        UnboundedAngle((self.0 as u32) << 16)
    }
}

/// A high-resolution phase accumulator.
///
/// The angle usable for trig sampling lives in the high 16 bits; the low 16
/// bits are sub-angle precision accumulated over time. The raw value wraps
/// modulo 2^32, which is exactly one turn of the high half.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Pod, Zeroable)]
pub struct UnboundedAngle(u32);

impl UnboundedAngle {
    /// Zero phase.
    pub const ZERO: Self = UnboundedAngle(0);

    /// Creates a phase from its raw representation.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        UnboundedAngle(raw)
    }

    /// Returns the raw phase.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Demotes the phase to its 16-bit angle sample.
    #[inline]
    pub const fn to_angle(self) -> BoundedAngle {
        BoundedAngle((self.0 >> 16) as u16)
    }

    /// Wrapping phase advance by an unsigned delta.
    #[inline]
    pub const fn wrapping_add(self, delta: u32) -> UnboundedAngle {
        UnboundedAngle(self.0.wrapping_add(delta))
    }

    /// Wrapping phase advance by a signed raw delta, interpreted through
    /// two's complement.
    #[inline]
    pub const fn wrapping_add_signed(self, delta: i32) -> UnboundedAngle {
        UnboundedAngle(self.0.wrapping_add(delta as u32))
    }
}

/// The output of [`sin_q1_15`]/[`cos_q1_15`]: a signed Q1.15 value in
/// `[-1, 1]`, raw `32767` ≈ 1.0.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Pod, Zeroable)]
pub struct TrigQ1_15(i16);

impl TrigQ1_15 {
    /// The largest representable value, ≈ 1.0.
    pub const MAX: Self = TrigQ1_15(32767);

    /// Creates a value from its raw Q1.15 representation.
    #[inline]
    pub const fn from_raw(raw: i16) -> Self {
        TrigQ1_15(raw)
    }

    /// Returns the raw Q1.15 value.
    #[inline]
    pub const fn get(self) -> i16 {
        self.0
    }

    /// Widens into the signed Q0.16 signal domain.
    #[inline]
    pub const fn to_sfrac(self) -> SFracQ0_16 {
        SFracQ0_16::from_raw((self.0 as i32) << 1)
    }
}

// Quarter-wave sine, sampled every 1/256 turn. Entry 64 is sin(1/4 turn).
const SIN_QUARTER: [i16; 65] = [
    0, 804, 1608, 2410, 3212, 4011, 4808, 5602,
    6393, 7179, 7962, 8739, 9512, 10278, 11039, 11793,
    12539, 13279, 14010, 14732, 15446, 16151, 16846, 17530,
    18204, 18868, 19519, 20159, 20787, 21403, 22005, 22594,
    23170, 23731, 24279, 24811, 25329, 25832, 26319, 26790,
    27245, 27683, 28105, 28510, 28898, 29268, 29621, 29956,
    30273, 30571, 30852, 31113, 31356, 31580, 31785, 31971,
    32137, 32285, 32412, 32521, 32609, 32678, 32728, 32757,
    32767,
];

#[inline]
fn sin_quarter_interp(q: u16) -> i32 {
    // `q` is a position within a quarter turn, inclusive of the peak.
    debug_assert!(q <= 0x4000);
    let index = (q >> 8) as usize;
    if index == 64 {
        return SIN_QUARTER[64] as i32;
    }
    let frac = (q & 0xFF) as i32;
    let a = SIN_QUARTER[index] as i32;
    let b = SIN_QUARTER[index + 1] as i32;
    a + (((b - a) * frac) >> 8)
}

/// Fixed-point sine of a turn-fraction angle.
pub fn sin_q1_15(angle: BoundedAngle) -> TrigQ1_15 {
    let raw = angle.get();
    let quadrant = raw >> 14;
    let q = raw & 0x3FFF;
    let value = match quadrant {
        0 => sin_quarter_interp(q),
        1 => sin_quarter_interp(0x4000 - q),
        2 => -sin_quarter_interp(q),
        _ => -sin_quarter_interp(0x4000 - q),
    };
    TrigQ1_15(value as i16)
}

/// Fixed-point cosine of a turn-fraction angle.
#[inline]
pub fn cos_q1_15(angle: BoundedAngle) -> TrigQ1_15 {
    sin_q1_15(angle.wrapping_add(BoundedAngle::QUARTER))
}

/// Sine widened into the signed Q0.16 signal domain.
#[inline]
pub fn sin_sfrac(angle: BoundedAngle) -> SFracQ0_16 {
    sin_q1_15(angle).to_sfrac()
}

/// Scales a raw Q16.16 magnitude by a Q1.15 trig value, with symmetric
/// rounding. The result stays in 64 bits so callers choose how to clamp.
#[inline]
pub fn scale_q16_16_by_trig(magnitude: i32, trig: TrigQ1_15) -> i64 {
    let mut result = magnitude as i64 * trig.get() as i64;
    result += if result >= 0 { 1 << 14 } else { -(1 << 14) };
    result / (1 << 15)
}

/// A piecewise-rational `atan2` over turn fractions.
///
/// Accurate to within a few hundredths of a turn: adequate for visual
/// rotation, not for geometry.
pub fn atan2_turns_approx(y: i16, x: i16) -> BoundedAngle {
    if x == 0 && y == 0 {
        return BoundedAngle::ZERO;
    }

    let abs_x = (x as i32).unsigned_abs();
    let abs_y = (y as i32).unsigned_abs();

    let max = abs_x.max(abs_y);
    let min = abs_x.min(abs_y);

    let z = (min << 16) / max; // Q0.16
    let one_minus_z = 65536 - z;

    const A_Q16: u32 = 65536 / 8; // 0.125 turns
    const B_Q16: u32 = 2847; // ≈ 0.04345 turns

    let inner = A_Q16 + ((B_Q16 * one_minus_z) >> 16);
    let base = (z * inner) >> 16; // 0..0.125 turns

    let mut angle = if abs_x >= abs_y { base } else { 16384 - base };
    if x < 0 {
        angle = 32768 - angle;
    }
    if y < 0 {
        angle = 65536 - angle;
    }

    BoundedAngle::from_raw((angle & 0xFFFF) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_round_trips() {
        for raw in [0u16, 1, 0x1234, 0x8000, 0xFFFF] {
            let a = BoundedAngle::from_raw(raw);
            assert_eq!(a.to_phase().to_angle(), a);
        }
    }

    #[test]
    fn sine_cardinal_points() {
        assert_eq!(sin_q1_15(BoundedAngle::ZERO).get(), 0);
        assert_eq!(sin_q1_15(BoundedAngle::QUARTER).get(), 32767);
        assert_eq!(sin_q1_15(BoundedAngle::HALF).get(), 0);
        assert_eq!(sin_q1_15(BoundedAngle::THREE_QUARTERS).get(), -32767);
        assert_eq!(cos_q1_15(BoundedAngle::ZERO).get(), 32767);
        assert_eq!(cos_q1_15(BoundedAngle::HALF).get(), -32767);
    }

    #[test]
    fn sine_is_odd() {
        for raw in [0x0100u16, 0x0800, 0x2000, 0x3C00] {
            let pos = sin_q1_15(BoundedAngle::from_raw(raw)).get() as i32;
            let neg = sin_q1_15(BoundedAngle::from_raw(0u16.wrapping_sub(raw))).get() as i32;
            assert!((pos + neg).abs() <= 2, "raw {:#x}: {} vs {}", raw, pos, neg);
        }
    }

    #[test]
    fn atan2_cardinal_directions() {
        assert_eq!(atan2_turns_approx(0, 0), BoundedAngle::ZERO);
        assert_eq!(atan2_turns_approx(0, 1000).get(), 0);
        assert_eq!(atan2_turns_approx(1000, 0).get(), 0x4000);
        assert_eq!(atan2_turns_approx(0, -1000).get(), 0x8000);
        assert_eq!(atan2_turns_approx(-1000, 0).get(), 0xC000);
    }

    #[test]
    fn atan2_diagonals() {
        // 1/8 turn within a small tolerance.
        let a = atan2_turns_approx(1000, 1000).get() as i32;
        assert!((a - 0x2000).abs() < 300, "{:#x}", a);
        let b = atan2_turns_approx(1000, -1000).get() as i32;
        assert!((b - 0x6000).abs() < 300, "{:#x}", b);
    }

    #[test]
    fn atan2_monotonic_in_first_octant() {
        let x = 20000i16;
        let mut last = 0u16;
        let mut y = -20000i32;
        while y <= 20000 {
            let a = atan2_turns_approx(y as i16, x).get();
            // The output wraps below the X axis; compare in a shifted frame.
            let shifted = a.wrapping_add(0x2000);
            assert!(shifted >= last, "y={}: {:#x} < {:#x}", y, shifted, last);
            last = shifted;
            y += 500;
        }
    }

    #[test]
    fn trig_scaling_rounds_symmetrically() {
        let t = TrigQ1_15::from_raw(12345);
        assert_eq!(
            scale_q16_16_by_trig(70000, t),
            -scale_q16_16_by_trig(-70000, t)
        );
    }
}

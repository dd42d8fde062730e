// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use bytemuck::{Pod, Zeroable};

/// Raw output of the noise sampler, before normalization.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Pod, Zeroable)]
pub struct NoiseRawU16(u16);

impl NoiseRawU16 {
    /// Creates a raw noise value.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        NoiseRawU16(raw)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }
}

/// A normalized pattern intensity spanning the full `0..=0xFFFF` range.
///
/// This is the currency of pattern layers: the final palette stage maps it to
/// an 8-bit palette index.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Pod, Zeroable)]
pub struct PatternNormU16(u16);

impl PatternNormU16 {
    /// Zero intensity.
    pub const ZERO: Self = PatternNormU16(0);
    /// Full intensity.
    pub const MAX: Self = PatternNormU16(0xFFFF);

    /// Creates a pattern intensity from its raw value.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        PatternNormU16(raw)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }
}

// xxh32-style avalanche over both lattice coordinates. The exact mix does
// not matter as long as neighbouring cells decorrelate; these primes do.
#[inline]
fn hash_2d(x: u32, y: u32) -> u16 {
    let mut h = x
        .wrapping_mul(0x9E37_79B1)
        .wrapping_add(y.wrapping_mul(0x85EB_CA77));
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE3D);
    h ^= h >> 13;
    (h >> 8) as u16
}

// Q0.16 smoothstep: t² · (3 − 2t).
#[inline]
fn ease(t: u16) -> u16 {
    let t = t as u64;
    let t2 = (t * t) >> 16;
    let inner = 3 * 65536 - 2 * t;
    let s = (t2 * inner) >> 16; // Q2.32 → Q0.16
    if s > 0xFFFF {
        0xFFFF
    } else {
        s as u16
    }
}

#[inline]
fn lerp_u16(a: u16, b: u16, t: u16) -> u16 {
    let delta = b as i64 - a as i64;
    (a as i64 + ((delta * t as i64) >> 16)) as u16
}

/// 2D value noise on a 2^16 lattice.
///
/// Inputs are interpreted as Q16.16: the integer lattice repeats every
/// `0x10000` raw units and wraps over the full `u32` domain, so any offset
/// (including the signed-plane offset applied by the pipeline source) is
/// valid input.
pub fn inoise16(x: u32, y: u32) -> NoiseRawU16 {
    let xi = x >> 16;
    let yi = y >> 16;
    let fx = ease((x & 0xFFFF) as u16);
    let fy = ease((y & 0xFFFF) as u16);

    let c00 = hash_2d(xi, yi);
    let c10 = hash_2d(xi.wrapping_add(1), yi);
    let c01 = hash_2d(xi, yi.wrapping_add(1));
    let c11 = hash_2d(xi.wrapping_add(1), yi.wrapping_add(1));

    let top = lerp_u16(c00, c10, fx);
    let bottom = lerp_u16(c01, c11, fx);
    NoiseRawU16(lerp_u16(top, bottom, fy))
}

/// 1D value noise, used by the time-indexed noise waveform.
pub fn inoise16_1d(x: u32) -> NoiseRawU16 {
    let xi = x >> 16;
    let fx = ease((x & 0xFFFF) as u16);
    let a = hash_2d(xi, 0x9E37_79B9);
    let b = hash_2d(xi.wrapping_add(1), 0x9E37_79B9);
    NoiseRawU16(lerp_u16(a, b, fx))
}

// The interpolated-corner distribution concentrates towards mid-range, so
// the usable band is narrower than the raw 16 bits. These bounds were
// measured against this sampler; re-measure if the sampler changes.
const NOISE_MIN: u16 = 12000;
const NOISE_MAX: u16 = 54000;

/// Stretches raw noise linearly over the full 16-bit range.
///
/// Values at or outside the calibrated `[12000, 54000]` band clamp to the
/// range ends, so the output always spans `0..=0xFFFF`.
pub fn normalise_noise(value: NoiseRawU16) -> PatternNormU16 {
    const RANGE: u32 = (NOISE_MAX - NOISE_MIN) as u32;
    let v = value.get();
    if v <= NOISE_MIN {
        return PatternNormU16::ZERO;
    }
    if v >= NOISE_MAX {
        return PatternNormU16::MAX;
    }
    let stretched = (v - NOISE_MIN) as u32 * 0xFFFF / RANGE;
    PatternNormU16::from_raw(stretched as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_deterministic() {
        assert_eq!(inoise16(12345, 67890), inoise16(12345, 67890));
        assert_eq!(inoise16_1d(424242), inoise16_1d(424242));
    }

    #[test]
    fn noise_hits_lattice_hashes() {
        // At lattice points the interpolation collapses to the corner hash.
        let v = inoise16(5 << 16, 9 << 16);
        assert_eq!(v.get(), hash_2d(5, 9));
    }

    #[test]
    fn noise_is_continuous_across_a_cell() {
        // Adjacent samples inside one cell differ by a bounded amount.
        let mut last = inoise16(7 << 16, 3 << 16).get() as i32;
        for step in 1..=64u32 {
            let v = inoise16((7 << 16) + step * 1024, 3 << 16).get() as i32;
            assert!((v - last).abs() < 8192, "step {}: {} -> {}", step, last, v);
            last = v;
        }
    }

    #[test]
    fn normalization_spans_full_range() {
        assert_eq!(normalise_noise(NoiseRawU16::from_raw(0)).get(), 0);
        assert_eq!(normalise_noise(NoiseRawU16::from_raw(12000)).get(), 0);
        assert_eq!(normalise_noise(NoiseRawU16::from_raw(54000)).get(), 0xFFFF);
        assert_eq!(normalise_noise(NoiseRawU16::from_raw(0xFFFF)).get(), 0xFFFF);

        let mid = normalise_noise(NoiseRawU16::from_raw(33000)).get();
        assert!((mid as i32 - 0x8000).abs() < 256, "{}", mid);
    }

    #[test]
    fn normalization_is_monotonic() {
        let mut last = 0u16;
        let mut raw = 0u32;
        while raw <= 0xFFFF {
            let v = normalise_noise(NoiseRawU16::from_raw(raw as u16)).get();
            assert!(v >= last);
            last = v;
            raw += 997;
        }
    }
}

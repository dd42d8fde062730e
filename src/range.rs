// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use alloc::boxed::Box;
use core::fmt;
use core::marker::PhantomData;

use tiny_polar_math::{
    bound, sin_sfrac, BoundedAngle, FracQ0_16, FracQ16_16, PatternNormU16, SFracQ0_16,
    TimeMillis, UV,
};

use crate::signal::Signal;

/// A total mapping from the signed unit signal domain into a target domain.
///
/// `map` must never fail: out-of-range inputs clamp or wrap according to the
/// implementing domain.
pub trait Range {
    /// The mapped value type.
    type Output;

    /// Maps a signal sample into the target domain.
    fn map(&self, t: SFracQ0_16) -> Self::Output;
}

/// How a [`LinearRange`] interprets the signed `[-1, 1]` input.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RangeMode {
    /// Use the signed input linearly: `-1` maps to `min`, `+1` to `max`.
    SignedDirect,
    /// Use the input's magnitude: `0` maps to `min`, `±1` to `max`.
    UnsignedFromSigned,
    /// [`SignedDirect`](RangeMode::SignedDirect) when `min < 0`, otherwise
    /// [`UnsignedFromSigned`](RangeMode::UnsignedFromSigned).
    Auto,
}

/// A value a [`LinearRange`] can produce. Implemented for the engine's raw
/// integers and strong numeric types.
pub trait LinearValue: Copy {
    /// Converts from the range's 64-bit working representation, which is
    /// guaranteed to lie between the raw `min` and `max` bounds.
    fn from_raw64(raw: i64) -> Self;
    /// Converts into the range's 64-bit working representation.
    fn to_raw64(self) -> i64;
}

macro_rules! impl_linear_value_int {
    ($($t:ty),+) => {$(
        impl LinearValue for $t {
            #[inline]
            fn from_raw64(raw: i64) -> Self { raw as $t }
            #[inline]
            fn to_raw64(self) -> i64 { self as i64 }
        }
    )+};
}

impl_linear_value_int!(i32, u32, u16, u8);

impl LinearValue for SFracQ0_16 {
    #[inline]
    fn from_raw64(raw: i64) -> Self {
        SFracQ0_16::from_raw(raw as i32)
    }
    #[inline]
    fn to_raw64(self) -> i64 {
        self.get() as i64
    }
}

impl LinearValue for FracQ0_16 {
    #[inline]
    fn from_raw64(raw: i64) -> Self {
        FracQ0_16::from_raw(raw as u16)
    }
    #[inline]
    fn to_raw64(self) -> i64 {
        self.get() as i64
    }
}

impl LinearValue for FracQ16_16 {
    #[inline]
    fn from_raw64(raw: i64) -> Self {
        FracQ16_16::from_raw(raw as i32)
    }
    #[inline]
    fn to_raw64(self) -> i64 {
        self.get() as i64
    }
}

/// A clamped linear mapping of the unit signal domain onto `[min, max]`.
#[derive(Copy, Clone, Debug)]
pub struct LinearRange<T> {
    min_raw: i64,
    max_raw: i64,
    mode: RangeMode,
    _value: PhantomData<T>,
}

/// Signed unit scalars, `[-1, 1]` by default.
pub type SFracRange = LinearRange<SFracQ0_16>;
/// Unsigned unit scalars, `[0, 1)` by default.
pub type ScalarRange = LinearRange<FracQ0_16>;
/// Noise-depth values in the unsigned 32-bit domain.
pub type DepthRange = LinearRange<u32>;
/// Durations in milliseconds.
pub type TimeRange = LinearRange<TimeMillis>;
/// 8-bit palette indices.
pub type PaletteRange = LinearRange<u8>;

impl<T: LinearValue> LinearRange<T> {
    /// Creates a range over `[min, max]`, swapping the bounds if reversed.
    pub fn new(min: T, max: T, mode: RangeMode) -> Self {
        let mut min_raw = min.to_raw64();
        let mut max_raw = max.to_raw64();
        if min_raw > max_raw {
            core::mem::swap(&mut min_raw, &mut max_raw);
        }
        LinearRange {
            min_raw,
            max_raw,
            mode,
            _value: PhantomData,
        }
    }

    fn resolved_mode(&self) -> RangeMode {
        match self.mode {
            RangeMode::Auto => {
                if self.min_raw < 0 {
                    RangeMode::SignedDirect
                } else {
                    RangeMode::UnsignedFromSigned
                }
            }
            mode => mode,
        }
    }
}

impl SFracRange {
    /// The full signed signal domain, mapped through unchanged.
    pub fn signed_unit() -> Self {
        LinearRange::new(SFracQ0_16::MIN, SFracQ0_16::ONE, RangeMode::SignedDirect)
    }
}

impl ScalarRange {
    /// The full unsigned unit domain.
    pub fn unit() -> Self {
        LinearRange::new(FracQ0_16::ZERO, FracQ0_16::MAX, RangeMode::UnsignedFromSigned)
    }
}

impl PaletteRange {
    /// The full 8-bit index domain.
    pub fn full() -> Self {
        LinearRange::new(0u8, 255u8, RangeMode::UnsignedFromSigned)
    }
}

impl<T: LinearValue> Range for LinearRange<T> {
    type Output = T;

    fn map(&self, t: SFracQ0_16) -> T {
        let span = self.max_raw - self.min_raw;
        if span == 0 {
            return T::from_raw64(self.min_raw);
        }

        match self.resolved_mode() {
            RangeMode::SignedDirect => {
                // The signed domain is [-ONE, ONE]; its width of 2^17 keeps
                // the full-range mapping an exact identity.
                let t_raw = bound(-65536, t.get() as i64, 65536);
                let scaled = (span * (t_raw + 65536) + (1 << 16)) >> 17;
                T::from_raw64(self.min_raw + scaled.min(span))
            }
            _ => {
                let t_raw = t.magnitude().get() as i64;
                let scaled = (span * t_raw + (1 << 15)) >> 16;
                T::from_raw64(self.min_raw + scaled.min(span))
            }
        }
    }
}

/// Maps signals to wrapping angular values.
///
/// The output spans the arc from `min` to `max`, crossing the seam when
/// `min > max`; the result wraps modulo one turn.
#[derive(Copy, Clone, Debug)]
pub struct PolarRange {
    min: BoundedAngle,
    max: BoundedAngle,
}

impl Default for PolarRange {
    fn default() -> Self {
        PolarRange {
            min: BoundedAngle::ZERO,
            max: BoundedAngle::from_raw(0xFFFF),
        }
    }
}

impl PolarRange {
    /// Creates a range over the arc from `min` to `max` (possibly across the
    /// seam).
    pub fn new(min: BoundedAngle, max: BoundedAngle) -> Self {
        PolarRange { min, max }
    }
}

impl Range for PolarRange {
    type Output = BoundedAngle;

    fn map(&self, t: SFracQ0_16) -> BoundedAngle {
        let min_raw = self.min.get();
        let max_raw = self.max.get();
        if min_raw == max_raw {
            return self.min;
        }

        let span: u32 = if max_raw > min_raw {
            (max_raw - min_raw) as u32
        } else {
            (0x10000 - min_raw as u32) + max_raw as u32
        };

        let t_raw = t.magnitude().get() as u32;
        let scaled = (span * t_raw) >> 16;
        BoundedAngle::from_raw(min_raw.wrapping_add(scaled as u16))
    }
}

/// Maps signals to pattern intensities; overflow past `max` folds back via
/// 16-bit wrap rather than clamping.
#[derive(Copy, Clone, Debug)]
pub struct PatternRange {
    min: u16,
    max: u16,
}

impl PatternRange {
    /// Creates a range over `[min, max]` intensities.
    pub fn new(min: PatternNormU16, max: PatternNormU16) -> Self {
        PatternRange {
            min: min.get(),
            max: max.get(),
        }
    }
}

impl Range for PatternRange {
    type Output = PatternNormU16;

    fn map(&self, t: SFracQ0_16) -> PatternNormU16 {
        let span = self.max.wrapping_sub(self.min) as u32;
        if span == 0 {
            return PatternNormU16::from_raw(self.min);
        }
        let t_raw = t.magnitude().get() as u32;
        let scaled = ((span * t_raw) >> 16) as u16;
        PatternNormU16::from_raw(self.min.wrapping_add(scaled))
    }
}

/// The zoom scale domain: raw Q0.16 scale factors, default 1/160 to 4.
#[derive(Copy, Clone, Debug)]
pub struct ZoomRange {
    min_raw: i32,
    max_raw: i32,
}

impl ZoomRange {
    /// Smallest zoom scale: 1/160, ≈ 0.00625×.
    pub const MIN_SCALE: SFracQ0_16 = SFracQ0_16::from_raw(65536 / 160);
    /// Largest zoom scale: 4×.
    pub const MAX_SCALE: SFracQ0_16 = SFracQ0_16::from_raw(4 * 65536);

    /// Creates a zoom range between two scale factors.
    pub fn new(min: SFracQ0_16, max: SFracQ0_16) -> Self {
        let mut min_raw = min.get();
        let mut max_raw = max.get();
        if min_raw > max_raw {
            core::mem::swap(&mut min_raw, &mut max_raw);
        }
        ZoomRange { min_raw, max_raw }
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        ZoomRange::new(Self::MIN_SCALE, Self::MAX_SCALE)
    }
}

impl Range for ZoomRange {
    type Output = SFracQ0_16;

    fn map(&self, t: SFracQ0_16) -> SFracQ0_16 {
        let span = self.max_raw as i64 - self.min_raw as i64;
        if span == 0 {
            return SFracQ0_16::from_raw(self.min_raw);
        }
        let t_raw = t.magnitude().get() as i64;
        let target = self.min_raw as i64 + ((t_raw * span) >> 16);
        SFracQ0_16::from_raw(bound(self.min_raw as i64, target, self.max_raw as i64) as i32)
    }
}

/// Decomposes a direction and a velocity into a Cartesian velocity vector.
///
/// `(x, y) = (v · r · cos θ, v · r · sin θ)` where `r` is the configured
/// maximum radius (raw units per second at full velocity). A negative
/// velocity flips the direction by half a turn.
#[derive(Copy, Clone, Debug)]
pub struct CartesianRange {
    radius: i32,
}

impl CartesianRange {
    /// 64 Q24.8 units per second at full velocity.
    pub const DEFAULT_RADIUS: i32 = 64 << 8;

    /// Creates a range with the given maximum radius in raw output units.
    pub fn new(radius: i32) -> Self {
        CartesianRange { radius }
    }

    /// Maps a direction (turn fraction) and a velocity into a vector.
    pub fn map(&self, direction: SFracQ0_16, velocity: SFracQ0_16) -> (i32, i32) {
        let vel_raw_signed = velocity.get();
        let negate = vel_raw_signed < 0;
        let vel_raw = velocity.magnitude().get() as i64;

        let mut dir_raw = (direction.get() as u32 & 0xFFFF) as u16;
        if negate {
            dir_raw = dir_raw.wrapping_add(0x8000);
        }
        let angle = BoundedAngle::from_raw(dir_raw);
        let cos = sin_sfrac(angle.wrapping_add(BoundedAngle::QUARTER)).get() as i64;
        let sin = sin_sfrac(angle).get() as i64;

        let scaled = self.radius as i64 * vel_raw;
        let mut dx = scaled * cos;
        let mut dy = scaled * sin;
        dx += if dx >= 0 { 1 << 31 } else { -(1 << 31) };
        dy += if dy >= 0 { 1 << 31 } else { -(1 << 31) };
        (
            (dx >> 32) as i32,
            (dy >> 32) as i32,
        )
    }
}

impl Default for CartesianRange {
    fn default() -> Self {
        CartesianRange::new(Self::DEFAULT_RADIUS)
    }
}

/// Maps signals onto the segment between two UV points.
#[derive(Copy, Clone, Debug)]
pub struct UVRange {
    min: UV,
    max: UV,
}

impl UVRange {
    /// Creates a range between two UV points.
    pub fn new(min: UV, max: UV) -> Self {
        UVRange { min, max }
    }
}

impl Range for UVRange {
    type Output = UV;

    fn map(&self, t: SFracQ0_16) -> UV {
        let t_raw = t.magnitude().get() as i64;
        let lerp = |min: FracQ16_16, max: FracQ16_16| -> FracQ16_16 {
            let span = max.get() as i64 - min.get() as i64;
            let raw = min.get() as i64 + ((span * t_raw) >> 16);
            FracQ16_16::from_raw(bound(i32::MIN as i64, raw, i32::MAX as i64) as i32)
        };
        UV::new(lerp(self.min.u, self.max.u), lerp(self.min.v, self.max.v))
    }
}

/// A signal paired with the range that maps its samples into a domain.
///
/// This is the adapter every transform consumes for its time-varying
/// parameters: sampling is `range.map(signal.sample(t))`.
pub struct MappedSignal<R: Range> {
    signal: Box<Signal>,
    range: R,
}

impl<R: Range> MappedSignal<R> {
    /// Creates a mapped signal.
    pub fn new(signal: Signal, range: R) -> Self {
        MappedSignal {
            signal: Box::new(signal),
            range,
        }
    }

    /// Samples the signal and maps the result.
    pub fn sample(&mut self, t: TimeMillis) -> R::Output {
        let value = self.signal.sample(t);
        self.range.map(value)
    }
}

impl MappedSignal<SFracRange> {
    /// Wraps a signal with the identity signed-unit mapping.
    pub fn signed_unit(signal: Signal) -> Self {
        MappedSignal::new(signal, SFracRange::signed_unit())
    }
}

impl MappedSignal<ScalarRange> {
    /// Wraps a signal with the unit magnitude mapping.
    pub fn unit(signal: Signal) -> Self {
        MappedSignal::new(signal, ScalarRange::unit())
    }
}

impl<R: Range + fmt::Debug> fmt::Debug for MappedSignal<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedSignal")
            .field("signal", &self.signal)
            .field("range", &self.range)
            .finish()
    }
}

// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use tiny_polar_math::{
    bound, inoise16, mul_q16_16_wrap, normalise_noise, CartQ24_8, FracQ16_16, SFracQ0_16,
    TimeMillis, UV,
};

use crate::layer::PipelineContext;
use crate::modulator::CartesianMotionAccumulator;
use crate::pipeline::NOISE_DOMAIN_OFFSET;
use crate::range::{CartesianRange, LinearRange, MappedSignal, ScalarRange, ZoomRange};
use crate::signal::Signal;

#[inline]
fn sat_i32(v: i64) -> i32 {
    bound(i32::MIN as i64, v, i32::MAX as i64) as i32
}

#[inline]
fn noise_coord(raw: i32) -> u32 {
    (raw as u32).wrapping_add(NOISE_DOMAIN_OFFSET)
}

#[inline]
fn centered_noise(ux: u32, uy: u32) -> i32 {
    normalise_noise(inoise16(ux, uy)).get() as i32 - 0x8000
}

/// Where the zoom signal anchors within the scale range.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ZoomAnchor {
    /// Signal 0 is the minimum scale, 1 the maximum.
    Floor,
    /// Signal 0.5 is the middle of the range.
    MidPoint,
    /// Signal 0 is the maximum scale, 1 the minimum.
    Ceiling,
}

/// Scales the plane towards the origin.
///
/// The sampled target scale is smoothed with a per-frame IIR whose alpha
/// shrinks as the scale shrinks: zoomed far out, the noise frequency under
/// the display is high and an unsmoothed zoom flickers. Publishes the
/// smoothed scale and its normalized position within the range to the
/// [`PipelineContext`].
#[derive(Debug)]
pub struct ZoomTransform {
    scale_signal: MappedSignal<ScalarRange>,
    anchor: ZoomAnchor,
    min_scale: i32,
    max_scale: i32,
    value: i32,
}

const ZOOM_SMOOTH_ALPHA_MIN: i64 = 65536 / 32;
const ZOOM_SMOOTH_ALPHA_MAX: i64 = 65536;

impl ZoomTransform {
    /// Creates a zoom over the default 1/160..4 scale range.
    pub fn new(scale: Signal) -> Self {
        Self::with_scale_range(scale, ZoomRange::MIN_SCALE, ZoomRange::MAX_SCALE)
    }

    /// Creates a zoom over a custom scale range.
    pub fn with_scale_range(scale: Signal, min: SFracQ0_16, max: SFracQ0_16) -> Self {
        let mut min_raw = min.get();
        let mut max_raw = max.get();
        if min_raw > max_raw {
            core::mem::swap(&mut min_raw, &mut max_raw);
        }
        ZoomTransform {
            scale_signal: MappedSignal::unit(scale),
            anchor: ZoomAnchor::Floor,
            min_scale: min_raw,
            max_scale: max_raw,
            value: min_raw,
        }
    }

    /// Sets how the signal maps into the scale range.
    pub fn with_anchor(mut self, anchor: ZoomAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, ctx: &mut PipelineContext) {
        let t_raw = self.scale_signal.sample(t).get() as i64;
        let span = self.max_scale as i64 - self.min_scale as i64;

        let target = match self.anchor {
            ZoomAnchor::Floor => self.min_scale as i64 + ((t_raw * span) >> 16),
            ZoomAnchor::Ceiling => self.max_scale as i64 - ((t_raw * span) >> 16),
            ZoomAnchor::MidPoint => {
                let half_span = span / 2;
                let mid = self.min_scale as i64 + half_span;
                let centered = t_raw - 0x8000;
                mid + (centered * half_span) / 0x8000
            }
        };
        let target = bound(self.min_scale as i64, target, self.max_scale as i64) as i32;

        // Lower target scale means higher noise frequency; smooth harder.
        let mut freq_bias = self.max_scale as i64 - target as i64;
        freq_bias = bound(0, freq_bias, span.max(0));
        let mut alpha = ZOOM_SMOOTH_ALPHA_MAX;
        if span > 0 {
            alpha -= (ZOOM_SMOOTH_ALPHA_MAX - ZOOM_SMOOTH_ALPHA_MIN) * freq_bias / span;
        }

        let delta = target as i64 - self.value as i64;
        let mut step = delta * alpha;
        step += if step >= 0 { 0x8000 } else { -0x8000 };
        step >>= 16;
        self.value = (self.value as i64 + step) as i32;

        ctx.zoom_scale = SFracQ0_16::from_raw(self.value);
        ctx.zoom_normalized = if span > 0 {
            let numer = bound(0, self.value as i64 - self.min_scale as i64, span);
            SFracQ0_16::from_raw(((numer << 16) / span) as i32)
        } else {
            SFracQ0_16::ONE
        };
    }

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        let sx = (x.get() as i64 * self.value as i64) >> 16;
        let sy = (y.get() as i64 * self.value as i64) >> 16;
        (
            CartQ24_8::from_raw(sat_i32(sx)),
            CartQ24_8::from_raw(sat_i32(sy)),
        )
    }

    /// Applies the transform to one UV coordinate.
    pub fn map_uv(&self, uv: UV) -> UV {
        let u = (uv.u.get() as i64 * self.value as i64) >> 16;
        let v = (uv.v.get() as i64 * self.value as i64) >> 16;
        UV::from_raw(sat_i32(u), sat_i32(v))
    }
}

/// Integrates a direction/velocity pair into a drifting offset.
///
/// The offset is smoothed with an alpha driven by the published normalized
/// zoom: zoomed out, translation steps cover more noise cells per pixel, so
/// the smoothing tightens to keep the drift fluid.
#[derive(Debug)]
pub struct TranslationTransform {
    motion: CartesianMotionAccumulator,
    offset: (i32, i32),
    has_smoothed: bool,
}

const TRANSLATION_SMOOTH_ALPHA_MIN: i64 = 65536 / 16;
const TRANSLATION_SMOOTH_ALPHA_MAX: i64 = 65536 / 2;

impl TranslationTransform {
    /// Creates a translation with the default velocity decomposition.
    pub fn new(direction: Signal, velocity: Signal) -> Self {
        Self::with_range(direction, velocity, CartesianRange::default())
    }

    /// Creates a translation with a custom velocity range.
    pub fn with_range(direction: Signal, velocity: Signal, range: CartesianRange) -> Self {
        TranslationTransform {
            motion: CartesianMotionAccumulator::new(
                range,
                MappedSignal::signed_unit(direction),
                MappedSignal::signed_unit(velocity),
            ),
            offset: (0, 0),
            has_smoothed: false,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, ctx: &mut PipelineContext) {
        let target = self.motion.advance(t);
        if !self.has_smoothed {
            self.offset = target;
            self.has_smoothed = true;
            return;
        }

        let zoom_norm = bound(0, ctx.zoom_normalized.get() as i64, 65536);
        let alpha = TRANSLATION_SMOOTH_ALPHA_MIN
            + (((TRANSLATION_SMOOTH_ALPHA_MAX - TRANSLATION_SMOOTH_ALPHA_MIN) * zoom_norm) >> 16);

        let dx = ((target.0 as i64 - self.offset.0 as i64) * alpha) >> 16;
        let dy = ((target.1 as i64 - self.offset.1 as i64) * alpha) >> 16;
        self.offset.0 = (self.offset.0 as i64 + dx) as i32;
        self.offset.1 = (self.offset.1 as i64 + dy) as i32;
    }

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        (
            CartQ24_8::from_raw(x.get().wrapping_add(self.offset.0)),
            CartQ24_8::from_raw(y.get().wrapping_add(self.offset.1)),
        )
    }

    /// Applies the transform to one UV coordinate.
    pub fn map_uv(&self, uv: UV) -> UV {
        UV::from_raw(
            uv.u.get().wrapping_add(self.offset.0),
            uv.v.get().wrapping_add(self.offset.1),
        )
    }
}

/// Wraps each axis into `[0, tile)`. A zero tile leaves the axis unchanged.
///
/// Negative coordinates wrap into the positive tile, so the tiling is
/// seamless across the origin.
#[derive(Debug)]
pub struct TilingTransform {
    tile_x: CartQ24_8,
    tile_y: CartQ24_8,
}

impl TilingTransform {
    /// Creates a tiling with per-axis periods.
    pub fn new(tile_x: CartQ24_8, tile_y: CartQ24_8) -> Self {
        TilingTransform { tile_x, tile_y }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, _t: TimeMillis, _ctx: &mut PipelineContext) {}

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        let wrap = |v: i32, tile: i32| -> i32 {
            if tile <= 0 {
                v
            } else {
                v.rem_euclid(tile)
            }
        };
        (
            CartQ24_8::from_raw(wrap(x.get(), self.tile_x.get())),
            CartQ24_8::from_raw(wrap(y.get(), self.tile_y.get())),
        )
    }
}

/// Reflects one or both axes: `x' = |x|`.
#[derive(Debug)]
pub struct MirrorTransform {
    mirror_x: bool,
    mirror_y: bool,
}

impl MirrorTransform {
    /// Creates a mirror over the selected axes.
    pub fn new(mirror_x: bool, mirror_y: bool) -> Self {
        MirrorTransform { mirror_x, mirror_y }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, _t: TimeMillis, _ctx: &mut PipelineContext) {}

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        let refl = |v: i32, on: bool| -> i32 {
            if !on {
                v
            } else if v == i32::MIN {
                i32::MAX
            } else {
                v.abs()
            }
        };
        (
            CartQ24_8::from_raw(refl(x.get(), self.mirror_x)),
            CartQ24_8::from_raw(refl(y.get(), self.mirror_y)),
        )
    }
}

/// Skews each axis by the other: `x' = x + kx·y`, `y' = y + ky·x`.
#[derive(Debug)]
pub struct ShearTransform {
    kx: FracQ16_16,
    ky: FracQ16_16,
}

impl ShearTransform {
    /// Creates a shear with Q16.16 coefficients.
    pub fn new(kx: FracQ16_16, ky: FracQ16_16) -> Self {
        ShearTransform { kx, ky }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, _t: TimeMillis, _ctx: &mut PipelineContext) {}

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        let dx = mul_q16_16_wrap(self.kx.get(), y.get());
        let dy = mul_q16_16_wrap(self.ky.get(), x.get());
        (
            CartQ24_8::from_raw(x.get().wrapping_add(dx)),
            CartQ24_8::from_raw(y.get().wrapping_add(dy)),
        )
    }
}

/// Curves each axis by the square of the other: `x' = x + kx·y²`.
#[derive(Debug)]
pub struct BendTransform {
    kx: FracQ16_16,
    ky: FracQ16_16,
}

impl BendTransform {
    /// Creates a bend with Q16.16 coefficients.
    pub fn new(kx: FracQ16_16, ky: FracQ16_16) -> Self {
        BendTransform { kx, ky }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, _t: TimeMillis, _ctx: &mut PipelineContext) {}

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        // Squares stay in 64 bits; the result saturates back into Q24.8.
        let sq = |v: i32| -> i64 { (v as i64 * v as i64) >> 8 };
        let dx = (self.kx.get() as i64 * (sq(y.get()) >> 8)) >> 16;
        let dy = (self.ky.get() as i64 * (sq(x.get()) >> 8)) >> 16;
        (
            CartQ24_8::from_raw(sat_i32(x.get() as i64 + (dx << 8))),
            CartQ24_8::from_raw(sat_i32(y.get() as i64 + (dy << 8))),
        )
    }
}

/// Scales the axes independently: `(x, y) → (x·sx, y·sy)`.
#[derive(Debug)]
pub struct AnisotropicScaleTransform {
    sx: FracQ16_16,
    sy: FracQ16_16,
}

impl AnisotropicScaleTransform {
    /// Creates an anisotropic scale with Q16.16 factors.
    pub fn new(sx: FracQ16_16, sy: FracQ16_16) -> Self {
        AnisotropicScaleTransform { sx, sy }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, _t: TimeMillis, _ctx: &mut PipelineContext) {}

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        (
            CartQ24_8::from_raw(mul_q16_16_wrap(x.get(), self.sx.get())),
            CartQ24_8::from_raw(mul_q16_16_wrap(y.get(), self.sy.get())),
        )
    }
}

/// A one-point perspective: `(x, y) · 1 / (1 + k·y)`.
#[derive(Debug)]
pub struct PerspectiveWarpTransform {
    k_signal: MappedSignal<LinearRange<i32>>,
    k: i32,
}

impl PerspectiveWarpTransform {
    // Keeps the denominator away from zero (raw Q16.16).
    const DENOM_EPSILON: i64 = 64;

    /// Creates a perspective warp; `k` maps into raw Q16.16 per-unit
    /// foreshortening.
    pub fn new(k: MappedSignal<LinearRange<i32>>) -> Self {
        PerspectiveWarpTransform { k_signal: k, k: 0 }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, _ctx: &mut PipelineContext) {
        self.k = self.k_signal.sample(t);
    }

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        // k·y in Q16.16: k is per-unit, y has 8 fractional bits.
        let ky = (self.k as i64 * y.get() as i64) >> 8;
        let mut denom = 65536 + ky;
        if denom.abs() < Self::DENOM_EPSILON {
            denom = if denom < 0 {
                -Self::DENOM_EPSILON
            } else {
                Self::DENOM_EPSILON
            };
        }
        let sx = ((x.get() as i64) << 16) / denom;
        let sy = ((y.get() as i64) << 16) / denom;
        (
            CartQ24_8::from_raw(sat_i32(sx)),
            CartQ24_8::from_raw(sat_i32(sy)),
        )
    }
}

/// Offsets the plane by the noise value at the sample point itself.
#[derive(Debug)]
pub struct NoiseWarpTransform {
    kx_signal: MappedSignal<LinearRange<i32>>,
    ky_signal: MappedSignal<LinearRange<i32>>,
    kx: i32,
    ky: i32,
}

impl NoiseWarpTransform {
    /// Creates a noise warp; the signals map to maximum offsets in raw
    /// Q24.8 units.
    pub fn new(
        kx: MappedSignal<LinearRange<i32>>,
        ky: MappedSignal<LinearRange<i32>>,
    ) -> Self {
        NoiseWarpTransform {
            kx_signal: kx,
            ky_signal: ky,
            kx: 0,
            ky: 0,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, _ctx: &mut PipelineContext) {
        self.kx = self.kx_signal.sample(t);
        self.ky = self.ky_signal.sample(t);
    }

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        let c = centered_noise(noise_coord(x.get()), noise_coord(y.get())) as i64;
        let dx = (c * self.kx as i64) >> 15;
        let dy = (c * self.ky as i64) >> 15;
        (
            CartQ24_8::from_raw(sat_i32(x.get() as i64 + dx)),
            CartQ24_8::from_raw(sat_i32(y.get() as i64 + dy)),
        )
    }
}

/// Displaces whole tiles by a hash of their index.
#[derive(Debug)]
pub struct TileJitterTransform {
    tile_x: CartQ24_8,
    tile_y: CartQ24_8,
    amplitude: MappedSignal<ScalarRange>,
    max_offset: CartQ24_8,
    amp: u16,
}

impl TileJitterTransform {
    /// Creates a tile jitter over `tile_x × tile_y` tiles, displacing each
    /// by up to `max_offset` scaled by the amplitude signal.
    pub fn new(
        tile_x: CartQ24_8,
        tile_y: CartQ24_8,
        amplitude: Signal,
        max_offset: CartQ24_8,
    ) -> Self {
        TileJitterTransform {
            tile_x,
            tile_y,
            amplitude: MappedSignal::unit(amplitude),
            max_offset,
            amp: 0,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, _ctx: &mut PipelineContext) {
        self.amp = self.amplitude.sample(t).get();
    }

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        let index = |v: i32, tile: i32| -> i32 {
            if tile <= 0 {
                0
            } else {
                v.div_euclid(tile)
            }
        };
        let ix = index(x.get(), self.tile_x.get());
        let iy = index(y.get(), self.tile_y.get());

        // The tile index is hashed through the noise lattice: whole-lattice
        // steps decorrelate neighbouring tiles.
        let jx = centered_noise((ix as u32) << 16, (iy as u32) << 16) as i64;
        let jy = centered_noise(((ix as u32) << 16).wrapping_add(0x9E37 << 16), (iy as u32) << 16)
            as i64;

        let scale = |c: i64| -> i64 {
            let amp_scaled = (c * self.amp as i64) >> 16;
            (amp_scaled * self.max_offset.get() as i64) >> 15
        };
        (
            CartQ24_8::from_raw(sat_i32(x.get() as i64 + scale(jx))),
            CartQ24_8::from_raw(sat_i32(y.get() as i64 + scale(jy))),
        )
    }
}

/// Advects the plane along an approximate curl of the noise field.
///
/// The curl of a scalar field's gradient rotated by 90° is divergence-free,
/// which reads as swirling, volume-preserving flow.
#[derive(Debug)]
pub struct CurlFlowTransform {
    amplitude: MappedSignal<ScalarRange>,
    max_offset: CartQ24_8,
    sample_shift: u8,
    amp: u16,
}

impl CurlFlowTransform {
    /// Creates a curl flow; `sample_shift` sets the finite-difference step
    /// as a power of two in the noise domain.
    pub fn new(amplitude: Signal, max_offset: CartQ24_8, sample_shift: u8) -> Self {
        CurlFlowTransform {
            amplitude: MappedSignal::unit(amplitude),
            max_offset,
            sample_shift,
            amp: 0,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, _ctx: &mut PipelineContext) {
        self.amp = self.amplitude.sample(t).get();
    }

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        let h = 1u32 << self.sample_shift;
        let ux = noise_coord(x.get());
        let uy = noise_coord(y.get());

        let dn_dx = centered_noise(ux.wrapping_add(h), uy) as i64
            - centered_noise(ux.wrapping_sub(h), uy) as i64;
        let dn_dy = centered_noise(ux, uy.wrapping_add(h)) as i64
            - centered_noise(ux, uy.wrapping_sub(h)) as i64;

        let scale = |d: i64| -> i64 {
            let amp_scaled = (d * self.amp as i64) >> 16;
            (amp_scaled * self.max_offset.get() as i64) >> 16
        };
        (
            CartQ24_8::from_raw(sat_i32(x.get() as i64 + scale(dn_dy))),
            CartQ24_8::from_raw(sat_i32(y.get() as i64 - scale(dn_dx))),
        )
    }
}

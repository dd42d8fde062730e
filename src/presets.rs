// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Ready-made layer compositions.
//!
//! Nothing here adds mechanism: every preset is a pipeline assembled from
//! the transform catalog with hand-tuned signal parameters. They double as
//! worked examples of the builder API.

use tiny_polar_math::{CartQ24_8, FracQ0_16, FracQ16_16, SFracQ0_16};

use crate::color::Palette16;
use crate::layer::Layer;
use crate::pipeline::{NoiseSource, Pipeline};
use crate::range::{LinearRange, MappedSignal, RangeMode};
use crate::signal::{self, LoopMode, Signal};
use crate::transform::{
    AnisotropicScaleTransform, BendTransform, CurlFlowTransform, DomainWarpTransform,
    KaleidoscopeTransform, LensDistortionTransform, MirrorTransform, NoiseWarpTransform,
    PaletteTransform, PerspectiveWarpTransform, PosterizePolarTransform, RadialScaleTransform,
    RotationTransform, ShearTransform, TileJitterTransform, TilingTransform, TranslationTransform,
    VortexTransform, WarpKind, ZoomAnchor, ZoomTransform,
};

const BASE_WARP_SCALE: CartQ24_8 = CartQ24_8::from_int(1);
const STRONG_WARP_SCALE: CartQ24_8 = CartQ24_8::from_int(2);
const MAX_OFFSET_SOFT: CartQ24_8 = CartQ24_8::from_int(2);
const MAX_OFFSET_MED: CartQ24_8 = CartQ24_8::from_int(4);
const MAX_OFFSET_STRONG: CartQ24_8 = CartQ24_8::from_int(6);

// A full-swing sine at the given per-mil turns-per-second speed.
fn osc(speed_per_mil: i32) -> Signal {
    signal::wave(signal::constant_per_mil(speed_per_mil), signal::sine)
}

// A full-swing noise drift at the given per-mil turns-per-second speed.
fn drift(speed_per_mil: i32) -> Signal {
    signal::wave(signal::constant_per_mil(speed_per_mil), signal::noise)
}

// A full-swing pulse at the given per-mil turns-per-second speed.
fn beat(speed_per_mil: i32) -> Signal {
    signal::wave(signal::constant_per_mil(speed_per_mil), signal::pulse)
}

// A slow forever-looping palette sweep.
fn palette_sweep(period_ms: u32) -> PaletteTransform {
    PaletteTransform::new(signal::linear(period_ms, LoopMode::Repeat))
}

/// The boot scene: gently zooming, drifting, rotating noise.
pub fn default_preset(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Noise)
        .cartesian(ZoomTransform::new(osc(40)))
        .cartesian(TranslationTransform::new(drift(60), signal::constant_per_mil(350)))
        .to_polar()
        .polar(RotationTransform::new(drift(30)))
        .palette(palette_sweep(45_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Concentric bands rushing past, barrel-distorted into a tunnel.
pub fn barrel_tunnel(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Noise)
        .cartesian(ZoomTransform::new(signal::constant_per_mil(250)).with_anchor(ZoomAnchor::Ceiling))
        .to_polar()
        .polar(LensDistortionTransform::new(osc(120)))
        .polar(RotationTransform::new(signal::linear(12_000, LoopMode::Repeat)))
        .palette(palette_sweep(20_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Ridged noise licked upwards by a directional warp.
pub fn noise_warp_flame(palette: Palette16) -> Layer {
    let kx = MappedSignal::new(
        drift(90),
        LinearRange::new(0i32, 3 << 8, RangeMode::UnsignedFromSigned),
    );
    let ky = MappedSignal::new(
        signal::constant_per_mil(800),
        LinearRange::new(0i32, 5 << 8, RangeMode::UnsignedFromSigned),
    );
    let pipeline = Pipeline::builder(NoiseSource::Ridged)
        .cartesian(NoiseWarpTransform::new(kx, ky))
        .cartesian(TranslationTransform::new(
            signal::constant(SFracQ0_16::from_ratio(1, 4)),
            signal::constant_per_mil(600),
        ))
        .to_polar()
        .palette(palette_sweep(30_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Tiled, mirrored noise folded into an eight-fold mandala.
pub fn tiled_mirror_mandala(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Noise)
        .cartesian(TilingTransform::new(
            CartQ24_8::from_int(96),
            CartQ24_8::from_int(96),
        ))
        .cartesian(MirrorTransform::new(true, true))
        .to_polar()
        .polar(KaleidoscopeTransform::mandala(8))
        .polar(RotationTransform::new(drift(25)))
        .palette(palette_sweep(60_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Nested domain warp over slow-breathing zoom: veined, marbled flow.
pub fn liquid_marble(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Noise)
        .cartesian(ZoomTransform::new(osc(20)).with_anchor(ZoomAnchor::MidPoint))
        .cartesian(DomainWarpTransform::with_kind(
            WarpKind::Nested,
            drift(100),
            signal::constant_per_mil(280),
            BASE_WARP_SCALE,
            MAX_OFFSET_STRONG,
            2,
            None,
            None,
        ))
        .to_polar()
        .palette(palette_sweep(40_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Small-amplitude noise warp rising slowly, like air over hot asphalt.
pub fn heat_shimmer(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Fbm(3))
        .cartesian(DomainWarpTransform::new(
            drift(120),
            signal::constant_per_mil(250),
            BASE_WARP_SCALE,
            MAX_OFFSET_SOFT,
        ))
        .cartesian(TranslationTransform::new(
            signal::constant(SFracQ0_16::from_ratio(1, 4)),
            signal::constant_per_mil(150),
        ))
        .to_polar()
        .palette(palette_sweep(50_000))
        .build();
    Layer::new(pipeline, palette)
}

/// A radius-proportional twist under slow rotation.
pub fn spiral_galaxy(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Fbm(4))
        .cartesian(ZoomTransform::new(signal::constant_per_mil(400)))
        .to_polar()
        .polar(VortexTransform::new(osc(15)))
        .polar(RotationTransform::new(signal::linear(90_000, LoopMode::Repeat)))
        .palette(palette_sweep(70_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Sheared turbulence racing through a perspective floor.
pub fn electric_tunnel(palette: Palette16) -> Layer {
    let k = MappedSignal::new(
        osc(80),
        LinearRange::new(-24_000i32, 24_000i32, RangeMode::SignedDirect),
    );
    let pipeline = Pipeline::builder(NoiseSource::Turbulence)
        .cartesian(PerspectiveWarpTransform::new(k))
        .cartesian(ShearTransform::new(
            FracQ16_16::from_raw(20_000),
            FracQ16_16::ZERO,
        ))
        .to_polar()
        .polar(RotationTransform::new(drift(45)))
        .palette(palette_sweep(25_000))
        .build();
    Layer::new(pipeline, palette)
}

/// A six-fold kaleidoscope whose radius pumps with a pulse wave.
pub fn starburst_pulse(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Noise)
        .cartesian(ZoomTransform::new(signal::constant_per_mil(350)))
        .to_polar()
        .polar(KaleidoscopeTransform::new(6, true))
        .polar(RadialScaleTransform::new(signal::scale(
            beat(140),
            FracQ0_16::HALF,
        )))
        .palette(palette_sweep(15_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Diagonal streaks blown sideways while falling.
pub fn rain_shear(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Ridged)
        .cartesian(AnisotropicScaleTransform::new(
            FracQ16_16::from_raw(3 << 16),
            FracQ16_16::from_raw(1 << 14),
        ))
        .cartesian(ShearTransform::new(
            FracQ16_16::from_raw(28_000),
            FracQ16_16::ZERO,
        ))
        .cartesian(TranslationTransform::new(
            signal::constant(SFracQ0_16::from_ratio(-1, 4)),
            signal::constant_per_mil(700),
        ))
        .to_polar()
        .palette(palette_sweep(35_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Lens ripples breathing in and out over bent noise.
pub fn ripple_ring(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Noise)
        .cartesian(BendTransform::new(
            FracQ16_16::from_raw(9_000),
            FracQ16_16::from_raw(9_000),
        ))
        .to_polar()
        .polar(LensDistortionTransform::new(osc(90)))
        .polar(RotationTransform::new(drift(20)))
        .palette(palette_sweep(30_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Hard angular and radial banding over drifting noise.
pub fn posterized_rings(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Noise)
        .cartesian(TranslationTransform::new(drift(40), signal::constant_per_mil(250)))
        .to_polar()
        .polar(PosterizePolarTransform::new(24, 8))
        .polar(RotationTransform::new(signal::linear(40_000, LoopMode::Repeat)))
        .palette(palette_sweep(40_000))
        .build();
    Layer::new(pipeline, palette)
}

/// A grid of tiles, each knocked out of place by its own hash.
pub fn jittered_tiles(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Noise)
        .cartesian(TileJitterTransform::new(
            CartQ24_8::from_int(48),
            CartQ24_8::from_int(48),
            osc(70),
            CartQ24_8::from_int(12),
        ))
        .cartesian(TilingTransform::new(
            CartQ24_8::from_int(48),
            CartQ24_8::from_int(48),
        ))
        .to_polar()
        .palette(palette_sweep(30_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Divergence-free advection: smoke curling without ever piling up.
pub fn curl_flow_smoke(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Fbm(3))
        .cartesian(CurlFlowTransform::new(
            drift(80),
            CartQ24_8::from_int(10),
            13,
        ))
        .cartesian(ZoomTransform::new(signal::constant_per_mil(300)))
        .to_polar()
        .palette(palette_sweep(55_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Foreshortened noise swept under the viewer.
pub fn perspective_depth(palette: Palette16) -> Layer {
    let k = MappedSignal::new(
        signal::constant_per_mil(500),
        LinearRange::new(0i32, 30_000i32, RangeMode::UnsignedFromSigned),
    );
    let pipeline = Pipeline::builder(NoiseSource::Noise)
        .cartesian(PerspectiveWarpTransform::new(k))
        .cartesian(TranslationTransform::new(
            signal::constant(SFracQ0_16::ZERO),
            signal::constant_per_mil(550),
        ))
        .to_polar()
        .palette(palette_sweep(28_000))
        .build();
    Layer::new(pipeline, palette)
}

/// Octave-stacked noise blooming through a mirrored tile grid.
pub fn fractal_tile_bloom(palette: Palette16) -> Layer {
    let pipeline = Pipeline::builder(NoiseSource::Fbm(5))
        .cartesian(TilingTransform::new(
            CartQ24_8::from_int(64),
            CartQ24_8::from_int(64),
        ))
        .cartesian(MirrorTransform::new(true, false))
        .cartesian(DomainWarpTransform::with_kind(
            WarpKind::Polar,
            drift(110),
            signal::constant_per_mil(220),
            STRONG_WARP_SCALE,
            MAX_OFFSET_MED,
            1,
            None,
            None,
        ))
        .to_polar()
        .polar(KaleidoscopeTransform::new(4, true))
        .palette(palette_sweep(65_000))
        .build();
    Layer::new(pipeline, palette)
}

// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/*!
`tiny-polar` is a tiny fixed-point procedural shader engine for small LED
displays: a 241-pixel concentric-ring disc, or an HUB75 matrix.

Each frame, every physical pixel is sampled once by evaluating a composition
of spatial and temporal transforms that map its polar coordinate to a
palette-mapped colour. All arithmetic is integer/fixed-point Q-format,
suitable for a 32-bit microcontroller without an FPU; the numeric substrate
lives in the `tiny-polar-math` kernel and is re-exported from [`math`].

The moving parts, bottom up:

1. [`Signal`] — a lazy, time-indexed sampler with a small waveform library
   (constant, ramps, easings, sine, noise, pulse).
2. Modulators — phase/motion accumulators that integrate signals over time.
3. [`Range`] — total mappings from the signed unit signal domain into
   angles, scalars, vectors, palette indices.
4. Transforms — per-frame stateful objects that bend the coordinate space
   (zoom, rotation, kaleidoscope, domain warp, …) or drive the palette.
5. [`Pipeline`] — an ordered chain of transforms over a noise source,
   evaluated per pixel into a pattern intensity.
6. [`Layer`], [`Scene`], [`SceneManager`] — compositing with blend modes and
   scene lifecycle.
7. [`Renderer`] — fills a caller-owned RGB buffer from a display's
   pixel→polar map.

The engine never fails observably: structural misuse of the pipeline is
logged via [`log`] and degrades to a constant-black layer. Nothing here
panics at render time and nothing allocates on the per-frame path.
*/

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::identity_op)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::too_many_arguments)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub use tiny_polar_math as math;

mod blend_mode;
mod color;
mod display;
mod layer;
mod modulator;
mod pipeline;
mod presets;
mod range;
mod renderer;
mod scene;
pub mod signal;
mod transform;

pub use blend_mode::BlendMode;
pub use color::{Palette16, Rgb};
pub use display::{DiscDisplaySpec, DisplaySpec, MatrixDisplaySpec};
pub use layer::{Layer, PipelineContext};
pub use modulator::{
    AngularModulator, CartesianMotionAccumulator, LinearMotion, PhaseAccumulator, ScalarMotion,
    MAX_DELTA_TIME_MS,
};
pub use pipeline::{
    CartesianStep, NoiseSource, Pipeline, PipelineBuilder, PipelineStep, PolarStep, UvStep,
    MAX_PIPELINE_STEPS, NOISE_DOMAIN_OFFSET,
};
pub use presets::*;
pub use range::{
    CartesianRange, DepthRange, LinearRange, MappedSignal, PaletteRange, PatternRange, PolarRange,
    Range, RangeMode, SFracRange, ScalarRange, TimeRange, UVRange, ZoomRange,
};
pub use renderer::Renderer;
pub use scene::{ColourMap, LoopingSceneProvider, Scene, SceneManager, SceneProvider};
pub use signal::{LoopMode, Signal, SignalKind};
pub use transform::{
    AnisotropicScaleTransform, BendTransform, CurlFlowTransform, DomainWarpTransform,
    KaleidoscopeTransform, LensDistortionTransform, MirrorTransform, NoiseWarpTransform,
    PaletteTransform, PerspectiveWarpTransform, PosterizePolarTransform, RadialScaleTransform,
    RotationTransform, ShearTransform, TileJitterTransform, TilingTransform, TranslationTransform,
    VortexTransform, WarpKind, ZoomAnchor, ZoomTransform,
};

pub use math::{
    BoundedAngle, CartQ24_8, FracQ0_16, FracQ16_16, PatternNormU16, SFracQ0_16, TimeMillis,
    TrigQ1_15, UnboundedAngle, UV,
};

// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The transform catalog.
//!
//! A transform is a per-layer object with two operations: `advance_frame`
//! ticks its internal signals (and may write to the layer's
//! [`PipelineContext`](crate::PipelineContext)), and `map` applies the
//! transform's coordinate logic at sample time. `map` is pure: all state
//! mutation happens in `advance_frame`, so a built colour map can be
//! evaluated any number of times within a frame.

mod cartesian;
mod palette;
mod polar;
mod warp;

pub use cartesian::{
    AnisotropicScaleTransform, BendTransform, CurlFlowTransform, MirrorTransform,
    NoiseWarpTransform, PerspectiveWarpTransform, ShearTransform, TileJitterTransform,
    TilingTransform, TranslationTransform, ZoomAnchor, ZoomTransform,
};
pub use palette::PaletteTransform;
pub use polar::{
    KaleidoscopeTransform, LensDistortionTransform, PosterizePolarTransform,
    RadialScaleTransform, RotationTransform, VortexTransform,
};
pub use warp::{DomainWarpTransform, WarpKind};

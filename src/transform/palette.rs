// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use tiny_polar_math::{FracQ0_16, TimeMillis};

use crate::layer::PipelineContext;
use crate::range::{MappedSignal, PaletteRange, ScalarRange};
use crate::signal::Signal;

/// Drives the palette lookup instead of the coordinate space.
///
/// Each frame the offset signal is mapped to an 8-bit index offset and
/// written to [`PipelineContext::palette_offset`]; the final palette stage
/// adds it to every pixel's index. An optional clip signal publishes a
/// brightness envelope: intensities below the clip level render black, with
/// a linear feather band above it.
#[derive(Debug)]
pub struct PaletteTransform {
    offset: MappedSignal<PaletteRange>,
    clip: Option<MappedSignal<ScalarRange>>,
    feather: FracQ0_16,
}

impl PaletteTransform {
    /// Creates a palette drive over the full index range.
    pub fn new(offset: Signal) -> Self {
        Self::with_range(offset, PaletteRange::full())
    }

    /// Creates a palette drive over a custom index range.
    pub fn with_range(offset: Signal, range: PaletteRange) -> Self {
        PaletteTransform {
            offset: MappedSignal::new(offset, range),
            clip: None,
            feather: FracQ0_16::ZERO,
        }
    }

    /// Adds a clip envelope: the clip signal sets the intensity floor and
    /// `feather` the width of the linear ramp above it.
    pub fn with_clip(mut self, clip: Signal, feather: FracQ0_16) -> Self {
        self.clip = Some(MappedSignal::unit(clip));
        self.feather = feather;
        self
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, ctx: &mut PipelineContext) {
        ctx.palette_offset = self.offset.sample(t);
        if let Some(clip) = &mut self.clip {
            ctx.clip_level = clip.sample(t);
            ctx.clip_feather = self.feather;
        }
    }
}

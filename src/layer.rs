// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use tiny_polar_math::{BoundedAngle, FracQ0_16, SFracQ0_16, TimeMillis};

use crate::blend_mode::BlendMode;
use crate::color::{Palette16, Rgb};
use crate::pipeline::Pipeline;

/// The shared, per-layer record carried alongside a transform chain.
///
/// Owned by the [`Layer`]; passed `&mut` to every transform's
/// `advance_frame` and read by the final palette stage at sample time. The
/// single-threaded frame ordering makes this race-free without sharing.
#[derive(Copy, Clone, Debug)]
pub struct PipelineContext {
    /// The zoom transform's current smoothed scale.
    pub zoom_scale: SFracQ0_16,
    /// The zoom scale remapped to `[0, 1]` over its range; translation
    /// smoothing reads this.
    pub zoom_normalized: SFracQ0_16,
    /// Added to every pixel's palette index by the final lookup.
    pub palette_offset: u8,
    /// Intensity floor below which pixels render black. Zero disables.
    pub clip_level: FracQ0_16,
    /// Width of the linear brightness ramp above the clip level.
    pub clip_feather: FracQ0_16,
}

impl Default for PipelineContext {
    fn default() -> Self {
        PipelineContext {
            zoom_scale: SFracQ0_16::ONE,
            zoom_normalized: SFracQ0_16::ONE,
            palette_offset: 0,
            clip_level: FracQ0_16::ZERO,
            clip_feather: FracQ0_16::ZERO,
        }
    }
}

/// A built colour map with an alpha and a blend mode.
///
/// Owns its [`Pipeline`] and [`PipelineContext`]. Construction validates the
/// pipeline's domain chain; a mismatch is logged once and the layer then
/// renders constant black forever — misuse never panics.
#[derive(Debug)]
pub struct Layer {
    pipeline: Pipeline,
    context: PipelineContext,
    palette: Palette16,
    alpha: FracQ0_16,
    blend_mode: BlendMode,
    valid: bool,
}

impl Layer {
    /// Creates a layer from a pipeline and a palette.
    pub fn new(pipeline: Pipeline, palette: Palette16) -> Self {
        let valid = match pipeline.check_domains() {
            Ok(()) => true,
            Err(step) => {
                log::warn!(
                    "pipeline domain mismatch at {}; substituting a black layer",
                    step
                );
                false
            }
        };
        Layer {
            pipeline,
            context: PipelineContext::default(),
            palette,
            alpha: FracQ0_16::MAX,
            blend_mode: BlendMode::Normal,
            valid,
        }
    }

    /// Sets the layer's alpha.
    pub fn with_alpha(mut self, alpha: FracQ0_16) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the layer's blend mode.
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    /// The layer's alpha.
    pub fn alpha(&self) -> FracQ0_16 {
        self.alpha
    }

    /// The layer's blend mode.
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Whether the pipeline's domain chain checked out at construction.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Ticks the layer's transforms.
    ///
    /// `progress` is the owning scene's normalized progress; `elapsed` is
    /// scene-relative milliseconds, which is the time base every signal in
    /// the pipeline samples against.
    pub fn advance_frame(&mut self, progress: FracQ0_16, elapsed: TimeMillis) {
        let _ = progress;
        if !self.valid {
            return;
        }
        self.pipeline.advance_frame(elapsed, &mut self.context);
    }

    /// Evaluates the layer's colour for one polar coordinate.
    pub fn colour_at(&self, angle: BoundedAngle, radius: FracQ0_16) -> Rgb {
        if !self.valid {
            return Rgb::BLACK;
        }
        let value = self.pipeline.pattern_at(angle, radius);
        let index = ((value.get() >> 8) as u8).wrapping_add(self.context.palette_offset);
        let colour = self.palette.sample(index);
        apply_clip_envelope(colour, value.get(), &self.context)
    }
}

fn apply_clip_envelope(colour: Rgb, value: u16, ctx: &PipelineContext) -> Rgb {
    let clip = ctx.clip_level.get();
    if clip == 0 {
        return colour;
    }
    if value < clip {
        return Rgb::BLACK;
    }
    let feather = ctx.clip_feather.get() as u32;
    if feather == 0 {
        return colour;
    }
    let above = (value - clip) as u32;
    if above >= feather {
        return colour;
    }
    colour.scaled(((above * 255) / feather) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_envelope_shapes_brightness() {
        let ctx = PipelineContext {
            clip_level: FracQ0_16::from_raw(0x4000),
            clip_feather: FracQ0_16::from_raw(0x2000),
            ..PipelineContext::default()
        };
        let c = Rgb::new(200, 100, 50);
        assert_eq!(apply_clip_envelope(c, 0x1000, &ctx), Rgb::BLACK);
        assert_eq!(apply_clip_envelope(c, 0x7000, &ctx), c);
        let mid = apply_clip_envelope(c, 0x5000, &ctx);
        assert!(mid.r > 0 && mid.r < 200, "{:?}", mid);
    }
}

// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use tiny_polar_math::{bound, BoundedAngle, FracQ0_16, TimeMillis};

use crate::layer::PipelineContext;
use crate::range::{MappedSignal, PolarRange, SFracRange};
use crate::signal::Signal;

/// Adds a time-varying angular offset to the input angle.
#[derive(Debug)]
pub struct RotationTransform {
    offset_signal: MappedSignal<PolarRange>,
    offset: BoundedAngle,
}

impl RotationTransform {
    /// Creates a rotation whose signal maps over the full turn.
    pub fn new(angle: Signal) -> Self {
        Self::with_range(angle, PolarRange::default())
    }

    /// Creates a rotation constrained to an arc.
    pub fn with_range(angle: Signal, range: PolarRange) -> Self {
        RotationTransform {
            offset_signal: MappedSignal::new(angle, range),
            offset: BoundedAngle::ZERO,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, _ctx: &mut PipelineContext) {
        self.offset = self.offset_signal.sample(t);
    }

    /// Applies the transform to one polar coordinate.
    pub fn map(&self, angle: BoundedAngle, radius: FracQ0_16) -> (BoundedAngle, FracQ0_16) {
        (angle.wrapping_add(self.offset), radius)
    }
}

/// Folds the angle into `facets` wedges, optionally mirroring each wedge
/// about its bisector.
///
/// The mandala variant multiplies the angle instead, letting the 16-bit wrap
/// repeat the whole pattern `facets` times around the disc.
#[derive(Debug)]
pub struct KaleidoscopeTransform {
    facets: u8,
    mirrored: bool,
    mandala: bool,
}

impl KaleidoscopeTransform {
    /// The largest supported facet count.
    pub const MAX_FACETS: u8 = 8;

    /// Creates a wedge-folding kaleidoscope. `facets` is clamped to
    /// `1..=MAX_FACETS`; one facet is an identity.
    pub fn new(facets: u8, mirrored: bool) -> Self {
        KaleidoscopeTransform {
            facets: bound(1, facets, Self::MAX_FACETS),
            mirrored,
            mandala: false,
        }
    }

    /// Creates an angle-multiplying mandala.
    pub fn mandala(facets: u8) -> Self {
        KaleidoscopeTransform {
            facets: bound(1, facets, Self::MAX_FACETS),
            mirrored: false,
            mandala: true,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, _t: TimeMillis, _ctx: &mut PipelineContext) {}

    /// Applies the transform to one polar coordinate.
    pub fn map(&self, angle: BoundedAngle, radius: FracQ0_16) -> (BoundedAngle, FracQ0_16) {
        if self.mandala {
            let folded = angle.get().wrapping_mul(self.facets as u16);
            return (BoundedAngle::from_raw(folded), radius);
        }

        let segment = 0x10000u32 / self.facets as u32;
        let m = angle.get() as u32 % segment;
        // Mirroring folds each wedge about its bisector, which keeps the
        // 1/facets periodicity intact.
        let folded = if self.mirrored { m.min(segment - m) } else { m };
        (BoundedAngle::from_raw(folded as u16), radius)
    }
}

/// Twists the angle proportionally to the radius.
///
/// Strength is clamped to ±1 turn so a full-radius pixel never wraps more
/// than once.
#[derive(Debug)]
pub struct VortexTransform {
    strength_signal: MappedSignal<SFracRange>,
    strength: i32, // raw Q16.16 turns
}

impl VortexTransform {
    /// Creates a vortex from a `[-1, 1]` strength signal.
    pub fn new(strength: Signal) -> Self {
        VortexTransform {
            strength_signal: MappedSignal::signed_unit(strength),
            strength: 0,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, _ctx: &mut PipelineContext) {
        self.strength = self.strength_signal.sample(t).get();
    }

    /// Applies the transform to one polar coordinate.
    pub fn map(&self, angle: BoundedAngle, radius: FracQ0_16) -> (BoundedAngle, FracQ0_16) {
        // Q16.16 turns scaled by the radius; raw Q16.16 units are angle
        // units, so the truncating cast is the modular add.
        let offset = ((self.strength as i64 * radius.get() as i64) >> 16) as i32;
        let new_angle = angle.get().wrapping_add(offset as u16);
        (BoundedAngle::from_raw(new_angle), radius)
    }
}

/// Barrel (`k > 0`) or pincushion (`k < 0`) distortion:
/// `r' = clamp(r · (1 + k · r), 0, 1)`.
#[derive(Debug)]
pub struct LensDistortionTransform {
    k_signal: MappedSignal<SFracRange>,
    k: i32,
}

impl LensDistortionTransform {
    /// Creates a lens distortion from a `[-1, 1]` coefficient signal.
    pub fn new(k: Signal) -> Self {
        LensDistortionTransform {
            k_signal: MappedSignal::signed_unit(k),
            k: 0,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, _ctx: &mut PipelineContext) {
        self.k = self.k_signal.sample(t).get();
    }

    /// Applies the transform to one polar coordinate.
    pub fn map(&self, angle: BoundedAngle, radius: FracQ0_16) -> (BoundedAngle, FracQ0_16) {
        let r = radius.get() as i64;
        let factor = 65536 + ((self.k as i64 * r) >> 16);
        let mut scaled = factor * r;
        scaled = (scaled + (1 << 15)) >> 16;
        let r_out = bound(0, scaled, 0xFFFF) as u16;
        (angle, FracQ0_16::from_raw(r_out))
    }
}

/// Pushes the radius in or out: `r' = clamp(r + k · r, 0, 1)`.
#[derive(Debug)]
pub struct RadialScaleTransform {
    k_signal: MappedSignal<SFracRange>,
    k: i32,
}

impl RadialScaleTransform {
    /// Creates a radial scale from a `[-1, 1]` coefficient signal.
    pub fn new(k: Signal) -> Self {
        RadialScaleTransform {
            k_signal: MappedSignal::signed_unit(k),
            k: 0,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, _ctx: &mut PipelineContext) {
        self.k = self.k_signal.sample(t).get();
    }

    /// Applies the transform to one polar coordinate.
    pub fn map(&self, angle: BoundedAngle, radius: FracQ0_16) -> (BoundedAngle, FracQ0_16) {
        let r = radius.get() as i64;
        let out = r + ((self.k as i64 * r) >> 16);
        (angle, FracQ0_16::from_raw(bound(0, out, 0xFFFF) as u16))
    }
}

/// Snaps angle and radius to discrete bins. Zero bins leave an axis alone.
#[derive(Debug)]
pub struct PosterizePolarTransform {
    angle_bins: u16,
    radius_bins: u16,
}

impl PosterizePolarTransform {
    /// Creates a posterizer with the given bin counts.
    pub fn new(angle_bins: u16, radius_bins: u16) -> Self {
        PosterizePolarTransform {
            angle_bins,
            radius_bins,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, _t: TimeMillis, _ctx: &mut PipelineContext) {}

    /// Applies the transform to one polar coordinate.
    pub fn map(&self, angle: BoundedAngle, radius: FracQ0_16) -> (BoundedAngle, FracQ0_16) {
        let a = if self.angle_bins > 1 {
            let step = 0x10000u32 / self.angle_bins as u32;
            let snapped = (angle.get() as u32 / step) * step;
            BoundedAngle::from_raw(snapped as u16)
        } else {
            angle
        };
        let r = if self.radius_bins > 1 {
            let step = 0x10000u32 / self.radius_bins as u32;
            let snapped = (radius.get() as u32 / step) * step;
            FracQ0_16::from_raw(snapped.min(0xFFFF) as u16)
        } else {
            radius
        };
        (a, r)
    }
}

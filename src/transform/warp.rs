// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use tiny_polar_math::{
    atan2_turns_approx, bound, cos_q1_15, inoise16, normalise_noise, sin_q1_15, BoundedAngle,
    CartQ24_8, TimeMillis,
};

use crate::layer::PipelineContext;
use crate::modulator::PhaseAccumulator;
use crate::pipeline::NOISE_DOMAIN_OFFSET;
use crate::range::{MappedSignal, PolarRange, ScalarRange};
use crate::signal::Signal;

// Decorrelates the Y displacement channel from the X channel.
const CHANNEL_SALT: u32 = 0x517C_C1B7;

/// The flavour of domain warp.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum WarpKind {
    /// One noise sample per axis.
    Basic,
    /// Octave-summed fractal Brownian motion.
    Fbm,
    /// Two passes: the first warp feeds the second's sample coordinates.
    Nested,
    /// Divergence-free advection from rotated noise gradients.
    Curl,
    /// Displacement decomposed along the radial/tangential frame.
    Polar,
    /// Displacement along a signal-driven flow direction.
    Directional,
}

/// Warps the Cartesian plane by a vector field derived from animated noise.
///
/// The phase accumulator advects the field over time; the amplitude signal
/// scales the configured maximum offset. `warp_scale` sets the field's
/// spatial frequency relative to the input coordinates.
#[derive(Debug)]
pub struct DomainWarpTransform {
    kind: WarpKind,
    phase: PhaseAccumulator,
    amplitude: MappedSignal<ScalarRange>,
    warp_scale: CartQ24_8,
    max_offset: CartQ24_8,
    octaves: u8,
    flow_direction: Option<MappedSignal<PolarRange>>,
    flow_strength: Option<MappedSignal<ScalarRange>>,
    z: u32,
    amp: u16,
    flow_dir: BoundedAngle,
    flow_str: u16,
}

impl DomainWarpTransform {
    /// Creates a [`WarpKind::Basic`] warp.
    pub fn new(
        phase_velocity: Signal,
        amplitude: Signal,
        warp_scale: CartQ24_8,
        max_offset: CartQ24_8,
    ) -> Self {
        Self::with_kind(
            WarpKind::Basic,
            phase_velocity,
            amplitude,
            warp_scale,
            max_offset,
            1,
            None,
            None,
        )
    }

    /// Creates a warp of any kind.
    ///
    /// `octaves` applies to [`WarpKind::Fbm`]; the flow signals apply to
    /// [`WarpKind::Directional`] and default to a static rightward flow.
    pub fn with_kind(
        kind: WarpKind,
        phase_velocity: Signal,
        amplitude: Signal,
        warp_scale: CartQ24_8,
        max_offset: CartQ24_8,
        octaves: u8,
        flow_direction: Option<Signal>,
        flow_strength: Option<Signal>,
    ) -> Self {
        DomainWarpTransform {
            kind,
            phase: PhaseAccumulator::new(MappedSignal::signed_unit(phase_velocity)),
            amplitude: MappedSignal::unit(amplitude),
            warp_scale,
            max_offset,
            octaves: bound(1, octaves, 6),
            flow_direction: flow_direction.map(|s| MappedSignal::new(s, PolarRange::default())),
            flow_strength: flow_strength.map(MappedSignal::unit),
            z: 0,
            amp: 0,
            flow_dir: BoundedAngle::ZERO,
            flow_str: 0xFFFF,
        }
    }

    /// Ticks the transform's signals for this frame.
    pub fn advance_frame(&mut self, t: TimeMillis, _ctx: &mut PipelineContext) {
        self.z = self.phase.advance(t).get();
        self.amp = self.amplitude.sample(t).get();
        if let Some(dir) = &mut self.flow_direction {
            self.flow_dir = dir.sample(t);
        }
        if let Some(strength) = &mut self.flow_strength {
            self.flow_str = strength.sample(t).get();
        }
    }

    // Scales an input coordinate into the warp field's noise domain.
    #[inline]
    fn field_coord(&self, v: i32) -> u32 {
        let scaled = (v as i64 * self.warp_scale.get() as i64) >> 8;
        (scaled as u32).wrapping_add(NOISE_DOMAIN_OFFSET)
    }

    #[inline]
    fn field_noise(&self, ux: u32, uy: u32, salt: u32) -> i32 {
        let sample = inoise16(ux.wrapping_add(self.z).wrapping_add(salt), uy);
        normalise_noise(sample).get() as i32 - 0x8000
    }

    // Centered field value [-0x8000, 0x7FFF] → raw Q24.8 displacement.
    #[inline]
    fn displacement(&self, centered: i64) -> i64 {
        let amp_scaled = (centered * self.amp as i64) >> 16;
        (amp_scaled * self.max_offset.get() as i64) >> 15
    }

    fn displacement_pair(&self, x: i32, y: i32) -> (i64, i64) {
        let ux = self.field_coord(x);
        let uy = self.field_coord(y);

        match self.kind {
            WarpKind::Basic | WarpKind::Nested => {
                let cx = self.field_noise(ux, uy, 0) as i64;
                let cy = self.field_noise(ux, uy, CHANNEL_SALT) as i64;
                (self.displacement(cx), self.displacement(cy))
            }
            WarpKind::Fbm => {
                let mut cx = 0i64;
                let mut cy = 0i64;
                let mut gain = 1 << 15; // halves per octave, Q0.16
                for octave in 0..self.octaves {
                    let shift = octave as u32;
                    let fx = ux.wrapping_shl(shift);
                    let fy = uy.wrapping_shl(shift);
                    cx += (self.field_noise(fx, fy, 0) as i64 * gain) >> 15;
                    cy += (self.field_noise(fx, fy, CHANNEL_SALT) as i64 * gain) >> 15;
                    gain >>= 1;
                }
                (self.displacement(cx), self.displacement(cy))
            }
            WarpKind::Curl => {
                let h = 1u32 << 13;
                let dn_dx = self.field_noise(ux.wrapping_add(h), uy, 0) as i64
                    - self.field_noise(ux.wrapping_sub(h), uy, 0) as i64;
                let dn_dy = self.field_noise(ux, uy.wrapping_add(h), 0) as i64
                    - self.field_noise(ux, uy.wrapping_sub(h), 0) as i64;
                (self.displacement(dn_dy / 2), self.displacement(-dn_dx / 2))
            }
            WarpKind::Polar => {
                let xi = bound(i16::MIN as i32, x >> 8, i16::MAX as i32) as i16;
                let yi = bound(i16::MIN as i32, y >> 8, i16::MAX as i32) as i16;
                let angle = atan2_turns_approx(yi, xi);
                let cos = cos_q1_15(angle).get() as i64;
                let sin = sin_q1_15(angle).get() as i64;

                let radial = self.displacement(self.field_noise(ux, uy, 0) as i64);
                let tangential =
                    self.displacement(self.field_noise(ux, uy, CHANNEL_SALT) as i64);
                (
                    (radial * cos - tangential * sin) >> 15,
                    (radial * sin + tangential * cos) >> 15,
                )
            }
            WarpKind::Directional => {
                let c = self.field_noise(ux, uy, 0) as i64;
                let along = (self.displacement(c) * self.flow_str as i64) >> 16;
                let cos = cos_q1_15(self.flow_dir).get() as i64;
                let sin = sin_q1_15(self.flow_dir).get() as i64;
                ((along * cos) >> 15, (along * sin) >> 15)
            }
        }
    }

    /// Applies the transform to one Cartesian coordinate.
    pub fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        let (mut dx, mut dy) = self.displacement_pair(x.get(), y.get());

        if self.kind == WarpKind::Nested {
            // Second pass, sampled at the once-warped coordinates.
            let wx = sat_i32(x.get() as i64 + dx);
            let wy = sat_i32(y.get() as i64 + dy);
            let (dx2, dy2) = self.displacement_pair(wx, wy);
            dx += dx2;
            dy += dy2;
        }

        (
            CartQ24_8::from_raw(sat_i32(x.get() as i64 + dx)),
            CartQ24_8::from_raw(sat_i32(y.get() as i64 + dy)),
        )
    }
}

#[inline]
fn sat_i32(v: i64) -> i32 {
    bound(i32::MIN as i64, v, i32::MAX as i64) as i32
}

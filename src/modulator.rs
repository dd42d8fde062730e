// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use core::fmt;

use tiny_polar_math::{
    add_wrap_q16_16, clamp_q16_16_raw, cos_q1_15, mul_q16_16_sat, scale_q16_16_by_trig, sin_q1_15,
    sqrt_u64, BoundedAngle, FracQ16_16, TimeMillis, UnboundedAngle,
};

use crate::range::{CartesianRange, LinearRange, MappedSignal, Range, SFracRange};

/// The largest time delta any accumulator will integrate in one step, in
/// milliseconds.
///
/// Bounds catch-up after a stall (debugger breakpoints, scheduling glitches)
/// so a long pause cannot cause a visual teleport. Applies to both positive
/// and negative deltas; zero disables the clamp.
pub const MAX_DELTA_TIME_MS: u32 = 200;

/// Computes the clamped, signed delta between two timestamps.
///
/// The subtraction is two's-complement, so a wrapped or regressed clock
/// degrades gracefully instead of producing a huge jump.
#[inline]
pub(crate) fn clamped_delta(last: TimeMillis, now: TimeMillis) -> i32 {
    let dt = now.wrapping_sub(last) as i32;
    if MAX_DELTA_TIME_MS == 0 {
        return dt;
    }
    let max = MAX_DELTA_TIME_MS as i32;
    dt.clamp(-max, max)
}

// Q0.16 fraction of a second; dt is already clamped well below one second.
#[inline]
fn delta_to_q0_16(dt: i32) -> i32 {
    ((dt as i64) << 16) as i32 / 1000
}

/// Integrates a turns-per-second speed signal into a wrapping phase.
///
/// The phase is a raw `u32` whose high 16 bits are the trig-ready angle; the
/// accumulator wraps modulo 2^32 (one turn).
pub struct PhaseAccumulator {
    phase: UnboundedAngle,
    last: Option<TimeMillis>,
    speed: MappedSignal<SFracRange>,
}

impl PhaseAccumulator {
    /// Creates an accumulator starting at phase zero.
    pub fn new(speed: MappedSignal<SFracRange>) -> Self {
        Self::with_phase(speed, BoundedAngle::ZERO)
    }

    /// Creates an accumulator starting at `initial`.
    pub fn with_phase(speed: MappedSignal<SFracRange>, initial: BoundedAngle) -> Self {
        PhaseAccumulator {
            phase: initial.to_phase(),
            last: None,
            speed,
        }
    }

    /// Returns the current phase without advancing time.
    pub fn phase(&self) -> UnboundedAngle {
        self.phase
    }

    /// Advances the phase to `t` and returns it.
    ///
    /// The first call only records the timestamp; a repeated call at the
    /// same `t` returns the phase unchanged.
    pub fn advance(&mut self, t: TimeMillis) -> UnboundedAngle {
        let last = match self.last {
            None => {
                self.last = Some(t);
                return self.phase;
            }
            Some(last) => last,
        };
        let dt = clamped_delta(last, t);
        self.last = Some(t);
        if dt == 0 {
            return self.phase;
        }

        let speed_raw = self.speed.sample(t).get() as i64;
        let numer = speed_raw * dt as i64 * 65536;
        let increment = if numer >= 0 {
            (numer + 500) / 1000
        } else {
            (numer - 500) / 1000
        };
        self.phase = self.phase.wrapping_add(increment as u32);
        self.phase
    }
}

impl fmt::Debug for PhaseAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseAccumulator")
            .field("phase", &self.phase)
            .field("last", &self.last)
            .finish()
    }
}

/// A phase accumulator sampled as a bounded angle.
///
/// Output is always in `[0, 1)` turns.
#[derive(Debug)]
pub struct AngularModulator {
    acc: PhaseAccumulator,
    initial: BoundedAngle,
}

impl AngularModulator {
    /// Creates a modulator from a turns-per-second speed signal.
    pub fn new(speed: MappedSignal<SFracRange>, initial: BoundedAngle) -> Self {
        AngularModulator {
            acc: PhaseAccumulator::new(speed),
            initial,
        }
    }

    /// Advances to `t` and returns the current angle.
    pub fn advance(&mut self, t: TimeMillis) -> BoundedAngle {
        self.initial.wrapping_add(self.acc.advance(t).to_angle())
    }
}

/// A 2D position accumulator: scalar speed along a modulated direction.
///
/// Position components are Q16.16. In bounded mode the position is kept
/// inside a circular radius by scaling it back after integration; unbounded
/// mode wraps.
#[derive(Debug)]
pub struct LinearMotion {
    x: FracQ16_16,
    y: FracQ16_16,
    speed: MappedSignal<LinearRange<i32>>,
    direction: AngularModulator,
    max_radius: Option<FracQ16_16>,
    last: Option<TimeMillis>,
}

impl LinearMotion {
    /// Creates an unbounded motion accumulator.
    ///
    /// `speed` maps to raw Q16.16 units per second and is clamped to ≥ 0 at
    /// integration time.
    pub fn new(speed: MappedSignal<LinearRange<i32>>, direction: AngularModulator) -> Self {
        LinearMotion {
            x: FracQ16_16::ZERO,
            y: FracQ16_16::ZERO,
            speed,
            direction,
            max_radius: None,
            last: None,
        }
    }

    /// Clamps the position inside a circle of `max_radius`.
    pub fn bounded(mut self, max_radius: FracQ16_16) -> Self {
        self.max_radius = Some(max_radius);
        self
    }

    /// The current position.
    pub fn position(&self) -> (FracQ16_16, FracQ16_16) {
        (self.x, self.y)
    }

    /// Advances the position to `t`.
    pub fn advance(&mut self, t: TimeMillis) -> (FracQ16_16, FracQ16_16) {
        let last = match self.last {
            None => {
                self.last = Some(t);
                return (self.x, self.y);
            }
            Some(last) => last,
        };
        let dt = clamped_delta(last, t);
        self.last = Some(t);
        if dt == 0 {
            return (self.x, self.y);
        }

        let dt_q16 = delta_to_q0_16(dt);
        let mut speed = self.speed.sample(t);
        if speed < 0 {
            speed = 0;
        }

        let distance = mul_q16_16_sat(speed, dt_q16);
        let dir = self.direction.advance(t);
        let dx = scale_q16_16_by_trig(distance, cos_q1_15(dir));
        let dy = scale_q16_16_by_trig(distance, sin_q1_15(dir));

        if self.max_radius.is_some() {
            self.x = FracQ16_16::from_raw(clamp_q16_16_raw(self.x.get() as i64 + dx));
            self.y = FracQ16_16::from_raw(clamp_q16_16_raw(self.y.get() as i64 + dy));
            self.apply_radial_clamp();
        } else {
            self.x = FracQ16_16::from_raw(add_wrap_q16_16(self.x.get(), dx as i32));
            self.y = FracQ16_16::from_raw(add_wrap_q16_16(self.y.get(), dy as i32));
        }
        (self.x, self.y)
    }

    fn apply_radial_clamp(&mut self) {
        let max_radius = match self.max_radius {
            Some(r) => r,
            None => return,
        };
        if max_radius.get() <= 0 {
            self.x = FracQ16_16::ZERO;
            self.y = FracQ16_16::ZERO;
            return;
        }

        let x_abs = self.x.get().unsigned_abs() as u64;
        let y_abs = self.y.get().unsigned_abs() as u64;

        // Squared distances compare in Q32.32 (raw Q16.16 squared).
        let dist_sq = x_abs * x_abs + y_abs * y_abs;
        let max_r = max_radius.get() as u64;
        let max_r_sq = max_r * max_r;
        if dist_sq <= max_r_sq {
            return;
        }

        let dist = sqrt_u64(dist_sq);
        if dist == 0 {
            self.x = FracQ16_16::ZERO;
            self.y = FracQ16_16::ZERO;
            return;
        }

        let factor = ((max_r << 16) / dist) as i64; // Q16.16
        let scaled_x = (self.x.get() as i64 * factor) >> 16;
        let scaled_y = (self.y.get() as i64 * factor) >> 16;
        self.x = FracQ16_16::from_raw(clamp_q16_16_raw(scaled_x));
        self.y = FracQ16_16::from_raw(clamp_q16_16_raw(scaled_y));
    }
}

/// Integrates direction and velocity signals into a raw Cartesian position.
///
/// Unlike [`LinearMotion`], the velocity vector is produced directly by a
/// [`CartesianRange`] decomposition, so both inputs are plain signals.
#[derive(Debug)]
pub struct CartesianMotionAccumulator {
    pos: (i32, i32),
    range: CartesianRange,
    direction: MappedSignal<SFracRange>,
    velocity: MappedSignal<SFracRange>,
    last: Option<TimeMillis>,
}

impl CartesianMotionAccumulator {
    /// Creates an accumulator at the origin.
    pub fn new(
        range: CartesianRange,
        direction: MappedSignal<SFracRange>,
        velocity: MappedSignal<SFracRange>,
    ) -> Self {
        CartesianMotionAccumulator {
            pos: (0, 0),
            range,
            direction,
            velocity,
            last: None,
        }
    }

    /// The current position.
    pub fn position(&self) -> (i32, i32) {
        self.pos
    }

    /// Advances the position to `t`.
    pub fn advance(&mut self, t: TimeMillis) -> (i32, i32) {
        let last = match self.last {
            None => {
                self.last = Some(t);
                return self.pos;
            }
            Some(last) => last,
        };
        let dt = clamped_delta(last, t);
        self.last = Some(t);
        if dt == 0 {
            return self.pos;
        }

        let dt_q16 = delta_to_q0_16(dt) as i64;
        let direction = self.direction.sample(t);
        let velocity = self.velocity.sample(t);
        let (vx, vy) = self.range.map(direction, velocity);

        let mut dx = vx as i64 * dt_q16;
        let mut dy = vy as i64 * dt_q16;
        dx += if dx >= 0 { 1 << 15 } else { -(1 << 15) };
        dy += if dy >= 0 { 1 << 15 } else { -(1 << 15) };
        dx >>= 16;
        dy >>= 16;

        self.pos.0 = (self.pos.0 as i64 + dx) as i32;
        self.pos.1 = (self.pos.1 as i64 + dy) as i32;
        self.pos
    }
}

/// Re-samples a mapped signal each frame into a value transforms can read.
#[derive(Debug)]
pub struct ScalarMotion<R: Range + fmt::Debug>
where
    R::Output: Copy + fmt::Debug,
{
    signal: MappedSignal<R>,
    value: R::Output,
}

impl<R: Range + fmt::Debug> ScalarMotion<R>
where
    R::Output: Copy + fmt::Debug,
{
    /// Creates a motion holding `initial` until the first advance.
    pub fn new(signal: MappedSignal<R>, initial: R::Output) -> Self {
        ScalarMotion {
            signal,
            value: initial,
        }
    }

    /// Samples the signal at `t` and caches the result.
    pub fn advance_frame(&mut self, t: TimeMillis) {
        self.value = self.signal.sample(t);
    }

    /// The most recently sampled value.
    pub fn value(&self) -> R::Output {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_clamps_both_directions() {
        assert_eq!(clamped_delta(1000, 1005), 5);
        assert_eq!(clamped_delta(1000, 5000), MAX_DELTA_TIME_MS as i32);
        assert_eq!(clamped_delta(5000, 1000), -(MAX_DELTA_TIME_MS as i32));
        // A wrapped clock is a small negative step, not a huge positive one.
        assert_eq!(clamped_delta(u32::MAX, 9), 10);
    }
}

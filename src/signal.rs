// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Time-indexed signals and the waveform library.
//!
//! A [`Signal`] is a lazy sampler: nothing ticks until `sample` is called
//! with the current time. Aperiodic waveforms (ramps, easings) carry a
//! duration and a [`LoopMode`]; periodic ones (sine, noise, pulse) integrate
//! a turns-per-second speed signal through a phase accumulator and shape the
//! result with amplitude, offset and phase-offset signals.

use alloc::boxed::Box;

use tiny_polar_math::{
    inoise16_1d, normalise_noise, sin_sfrac, BoundedAngle, FracQ0_16, SFracQ0_16, TimeMillis,
};

use crate::modulator::PhaseAccumulator;
use crate::range::MappedSignal;

/// Whether a signal repeats forever or has a finite lifetime.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SignalKind {
    /// Unbounded in time.
    Periodic,
    /// Has a fixed duration and a loop policy.
    Aperiodic,
}

/// What an aperiodic signal does once its duration elapses.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LoopMode {
    /// Hold the terminal value.
    Once,
    /// Restart from the beginning.
    Repeat,
    /// Run forward, then backward, alternating.
    PingPong,
}

/// How a periodic waveform turns a phase sample into a signed value.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum WaveShape {
    Sine,
    Noise,
    Pulse,
}

#[derive(Debug)]
enum Waveform {
    Constant(SFracQ0_16),
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    Periodic {
        acc: PhaseAccumulator,
        amplitude: Box<Signal>,
        offset: Box<Signal>,
        phase_offset: Box<Signal>,
        shape: WaveShape,
    },
    Scaled {
        inner: Box<Signal>,
        factor: FracQ0_16,
    },
}

/// A lazy, time-indexed sampler producing signed unit values.
///
/// Sampling is the only operation; the signal owns its time mapping (loop
/// policy for aperiodic signals, phase accumulation for periodic ones).
/// Sampling twice at the same instant is idempotent, but a signal is not
/// thread-safe: the engine guarantees single-threaded sampling per frame.
#[derive(Debug)]
pub struct Signal {
    kind: SignalKind,
    loop_mode: LoopMode,
    duration: TimeMillis,
    wave: Waveform,
}

impl Signal {
    /// The signal's kind.
    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    /// The loop policy. Meaningful only for aperiodic signals.
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// The duration in milliseconds. Zero for periodic signals.
    pub fn duration(&self) -> TimeMillis {
        self.duration
    }

    fn local_time(&self, t: TimeMillis) -> TimeMillis {
        if self.kind == SignalKind::Periodic || self.duration == 0 {
            return t;
        }
        match self.loop_mode {
            LoopMode::Once => t.min(self.duration),
            LoopMode::Repeat => t % self.duration,
            LoopMode::PingPong => {
                let period = self.duration * 2;
                let p = t % period;
                if p < self.duration {
                    p
                } else {
                    period - p
                }
            }
        }
    }

    /// Samples the signal at `t` milliseconds.
    pub fn sample(&mut self, t: TimeMillis) -> SFracQ0_16 {
        let local = self.local_time(t);
        let duration = self.duration;
        match &mut self.wave {
            Waveform::Constant(v) => *v,
            Waveform::Linear => unit_to_signed(progress(local, duration)),
            Waveform::QuadraticIn => {
                let p = progress(local, duration) as u32;
                unit_to_signed(((p * p) >> 16) as u16)
            }
            Waveform::QuadraticOut => {
                let p = progress(local, duration) as u32;
                let inv = 0xFFFF - p;
                unit_to_signed((0xFFFF - ((inv * inv) >> 16)) as u16)
            }
            Waveform::QuadraticInOut => {
                let p = progress(local, duration) as u32;
                if p < 0x8000 {
                    unit_to_signed(((p * p) >> 15) as u16)
                } else {
                    let inv = 0xFFFF - p;
                    unit_to_signed((0xFFFF - ((inv * inv) >> 15)) as u16)
                }
            }
            Waveform::Periodic {
                acc,
                amplitude,
                offset,
                phase_offset,
                shape,
            } => {
                let phase = acc.advance(t).to_angle();
                let phase_add = phase_offset.sample(t).magnitude().get();
                let final_phase = BoundedAngle::from_raw(phase.get().wrapping_add(phase_add));

                let wave_signed = sample_shape(*shape, final_phase);
                let wave_unit = wave_signed.to_unit().get() as i32;

                let amp = amplitude.sample(t).magnitude().get() as i64;
                let centered = (wave_unit - 0x8000) << 1;
                let scaled = ((centered as i64 * amp) >> 16) as i32;

                let half_wave = scaled >> 1;
                let half_offset = (offset.sample(t).magnitude().get() >> 1) as i32;
                let out_unit = 0x8000 + half_wave + half_offset;
                let out_unit = out_unit.clamp(0, 0xFFFF) as u16;
                unit_to_signed(out_unit)
            }
            Waveform::Scaled { inner, factor } => inner
                .sample(t)
                .mul_sat(SFracQ0_16::from_raw(factor.get() as i32)),
        }
    }
}

#[inline]
fn unit_to_signed(unit: u16) -> SFracQ0_16 {
    FracQ0_16::from_raw(unit).to_signed()
}

#[inline]
fn progress(t: TimeMillis, duration: TimeMillis) -> u16 {
    if duration == 0 {
        return 0;
    }
    let t = t.min(duration);
    ((t as u64 * 0xFFFF) / duration as u64) as u16
}

fn sample_shape(shape: WaveShape, phase: BoundedAngle) -> SFracQ0_16 {
    match shape {
        WaveShape::Sine => sin_sfrac(phase),
        WaveShape::Noise => {
            let raw = inoise16_1d(phase.get() as u32);
            let norm = normalise_noise(raw).get() as i32;
            SFracQ0_16::from_raw((norm - 0x8000) << 1)
        }
        WaveShape::Pulse => {
            let saw = phase.get();
            let pulse = if saw < 0x8000 {
                saw << 1
            } else {
                (0xFFFF - saw) << 1
            };
            SFracQ0_16::from_raw((pulse as i32 - 0x8000) << 1)
        }
    }
}

fn periodic(wave: Waveform) -> Signal {
    Signal {
        kind: SignalKind::Periodic,
        loop_mode: LoopMode::Repeat,
        duration: 0,
        wave,
    }
}

fn aperiodic(duration: TimeMillis, loop_mode: LoopMode, wave: Waveform) -> Signal {
    Signal {
        kind: SignalKind::Aperiodic,
        loop_mode,
        duration,
        wave,
    }
}

/// A signal that returns `value` for all time.
pub fn constant(value: SFracQ0_16) -> Signal {
    periodic(Waveform::Constant(value))
}

/// A constant signal from per-mil units (`250` is 0.25, `-500` is -0.5).
pub fn constant_per_mil(per_mil: i32) -> Signal {
    constant(SFracQ0_16::from_per_mil(per_mil))
}

/// A constant signal from whole percent (`50` is 0.5).
pub fn constant_frac(percent: i32) -> Signal {
    constant(SFracQ0_16::from_ratio(percent, 100))
}

/// The constant minimum of the signed domain.
pub fn floor() -> Signal {
    constant(SFracQ0_16::MIN)
}

/// The constant midpoint of the signed domain.
pub fn midpoint() -> Signal {
    constant(SFracQ0_16::ZERO)
}

/// The constant maximum of the signed domain.
pub fn ceiling() -> Signal {
    constant(SFracQ0_16::ONE)
}

/// A ramp from -1 to +1 over `duration`, then looped per `loop_mode`.
pub fn linear(duration: TimeMillis, loop_mode: LoopMode) -> Signal {
    aperiodic(duration, loop_mode, Waveform::Linear)
}

/// A quadratic ease-in over `duration`.
pub fn quadratic_in(duration: TimeMillis, loop_mode: LoopMode) -> Signal {
    aperiodic(duration, loop_mode, Waveform::QuadraticIn)
}

/// A quadratic ease-out over `duration`.
pub fn quadratic_out(duration: TimeMillis, loop_mode: LoopMode) -> Signal {
    aperiodic(duration, loop_mode, Waveform::QuadraticOut)
}

/// A quadratic ease-in-out over `duration`.
pub fn quadratic_in_out(duration: TimeMillis, loop_mode: LoopMode) -> Signal {
    aperiodic(duration, loop_mode, Waveform::QuadraticInOut)
}

fn shaped(
    speed: Signal,
    amplitude: Signal,
    offset: Signal,
    phase_offset: Signal,
    shape: WaveShape,
) -> Signal {
    periodic(Waveform::Periodic {
        acc: PhaseAccumulator::new(MappedSignal::signed_unit(speed)),
        amplitude: Box::new(amplitude),
        offset: Box::new(offset),
        phase_offset: Box::new(phase_offset),
        shape,
    })
}

/// A sine oscillator.
///
/// `speed` is sampled as turns per second and integrated into a phase;
/// the output is `midpoint + amplitude · sin(phase + phase_offset) + offset`.
pub fn sine(speed: Signal, amplitude: Signal, offset: Signal, phase_offset: Signal) -> Signal {
    shaped(speed, amplitude, offset, phase_offset, WaveShape::Sine)
}

/// Like [`sine`], but sampling 1D value noise at the accumulated phase.
pub fn noise(speed: Signal, amplitude: Signal, offset: Signal, phase_offset: Signal) -> Signal {
    shaped(speed, amplitude, offset, phase_offset, WaveShape::Noise)
}

/// Like [`sine`], but with a triangle wave (saw up, then saw down).
pub fn pulse(speed: Signal, amplitude: Signal, offset: Signal, phase_offset: Signal) -> Signal {
    shaped(speed, amplitude, offset, phase_offset, WaveShape::Pulse)
}

/// A full-amplitude oscillator with no offsets; the common case in presets.
pub fn wave(speed: Signal, shape_of: fn(Signal, Signal, Signal, Signal) -> Signal) -> Signal {
    shape_of(speed, ceiling(), midpoint(), midpoint())
}

/// Multiplies every sample of `signal` by an unsigned factor, saturating.
///
/// The result inherits the signal's kind, duration and loop policy.
pub fn scale(signal: Signal, factor: FracQ0_16) -> Signal {
    let kind = signal.kind;
    let loop_mode = signal.loop_mode;
    let duration = signal.duration;
    Signal {
        kind,
        loop_mode,
        duration,
        wave: Waveform::Scaled {
            inner: Box::new(signal),
            factor,
        },
    }
}

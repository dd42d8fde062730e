// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use tiny_polar::signal::{self, LoopMode};
use tiny_polar::{
    BoundedAngle, FracQ0_16, MappedSignal, PhaseAccumulator, SFracQ0_16,
};

const ONE: i32 = 65536;

fn assert_near(actual: i32, expected: i32, tolerance: i32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

#[test]
fn constant_holds_for_all_time() {
    let v = SFracQ0_16::from_raw(12345);
    let mut s = signal::constant(v);
    for t in [0u32, 1, 999, 1_000_000, u32::MAX] {
        assert_eq!(s.sample(t), v);
    }
}

#[test]
fn floor_midpoint_ceiling() {
    assert_eq!(signal::floor().sample(7), SFracQ0_16::MIN);
    assert_eq!(signal::midpoint().sample(7), SFracQ0_16::ZERO);
    assert_eq!(signal::ceiling().sample(7), SFracQ0_16::ONE);
}

#[test]
fn linear_spans_signed_unit() {
    let mut s = signal::linear(1000, LoopMode::Once);
    assert_near(s.sample(0).get(), -ONE, 4);
    assert_near(s.sample(500).get(), 0, 200);
    assert_near(s.sample(1000).get(), ONE, 4);
}

#[test]
fn linear_once_saturates_at_terminal_value() {
    let mut s = signal::linear(1000, LoopMode::Once);
    let terminal = s.sample(1000);
    assert_eq!(s.sample(1500), terminal);
    assert_eq!(s.sample(100_000), terminal);
    assert!(terminal.get() > ONE - 16);
}

#[test]
fn linear_repeat_matches_first_cycle() {
    let mut repeat = signal::linear(1000, LoopMode::Repeat);
    let mut once = signal::linear(1000, LoopMode::Once);
    for delta in [0u32, 1, 250, 500, 999] {
        let wrapped = repeat.sample(3000 + delta);
        let first = once.sample(delta);
        assert_near(wrapped.get(), first.get(), 4);
    }
}

#[test]
fn linear_ping_pong_reflects() {
    let mut s = signal::linear(1000, LoopMode::PingPong);
    let forward = s.sample(400);
    let reflected = s.sample(1600); // 1600 folds back to 400
    assert_near(reflected.get(), forward.get(), 4);
}

#[test]
fn quadratic_easings_hit_endpoints() {
    let mut ease_in = signal::quadratic_in(1000, LoopMode::Once);
    assert_near(ease_in.sample(0).get(), -ONE, 4);
    assert_near(ease_in.sample(1000).get(), ONE, 16);
    // Ease-in stays below the linear ramp at the halfway point.
    let mut lin = signal::linear(1000, LoopMode::Once);
    assert!(ease_in.sample(500).get() < lin.sample(500).get());

    let mut ease_out = signal::quadratic_out(1000, LoopMode::Once);
    assert!(ease_out.sample(500).get() > lin.sample(500).get());

    let mut ease_in_out = signal::quadratic_in_out(1000, LoopMode::Once);
    assert_near(ease_in_out.sample(500).get(), 0, 600);
}

fn unit_sine() -> tiny_polar::Signal {
    // 1 turn per second, full amplitude, no offsets.
    signal::sine(
        signal::ceiling(),
        signal::ceiling(),
        signal::midpoint(),
        signal::midpoint(),
    )
}

#[test]
fn sine_hits_quarter_points() {
    let mut s = unit_sine();
    let tolerance = ONE / 50; // 0.02 of signed unit

    // Sample densely so every accumulator step stays under the dt clamp.
    let mut values = std::collections::HashMap::new();
    for t in (0..=1000).step_by(50) {
        values.insert(t, s.sample(t as u32).get());
    }

    assert_near(values[&0], 0, tolerance);
    assert_near(values[&250], ONE, tolerance);
    assert_near(values[&500], 0, tolerance);
    assert_near(values[&750], -ONE, tolerance);
    assert_near(values[&1000], 0, tolerance);
}

#[test]
fn sine_resampling_at_same_time_is_idempotent() {
    let mut s = unit_sine();
    s.sample(0);
    s.sample(100);
    let a = s.sample(150);
    let b = s.sample(150);
    assert_eq!(a, b);
}

#[test]
fn pulse_is_a_triangle() {
    let mut s = signal::pulse(
        signal::ceiling(),
        signal::ceiling(),
        signal::midpoint(),
        signal::midpoint(),
    );
    let mut values = std::collections::HashMap::new();
    for t in (0..=1000).step_by(50) {
        values.insert(t, s.sample(t as u32).get());
    }
    // Phase 0 is the bottom of the ramp; half a period is the top.
    assert_near(values[&0], -ONE, ONE / 50);
    assert_near(values[&500], ONE, ONE / 50);
    assert_near(values[&250], 0, ONE / 25);
}

#[test]
fn scale_multiplies_samples() {
    let mut s = signal::scale(signal::ceiling(), FracQ0_16::HALF);
    assert_near(s.sample(0).get(), ONE / 2, 4);

    let mut neg = signal::scale(signal::floor(), FracQ0_16::HALF);
    assert_near(neg.sample(0).get(), -ONE / 2, 4);
}

#[test]
fn scale_preserves_loop_metadata() {
    let inner = signal::linear(2000, LoopMode::PingPong);
    let scaled = signal::scale(inner, FracQ0_16::HALF);
    assert_eq!(scaled.duration(), 2000);
    assert_eq!(scaled.loop_mode(), LoopMode::PingPong);
}

#[test]
fn phase_accumulator_step_size_invariance() {
    // 200 steps of 5 ms and 5 steps of 200 ms integrate the same phase;
    // both stay within the delta clamp.
    let speed = || MappedSignal::signed_unit(signal::ceiling());

    let mut fine = PhaseAccumulator::new(speed());
    let mut t = 0u32;
    fine.advance(0);
    for _ in 0..200 {
        t += 5;
        fine.advance(t);
    }

    let mut coarse = PhaseAccumulator::new(speed());
    coarse.advance(0);
    for i in 1..=5u32 {
        coarse.advance(i * 200);
    }

    let a = fine.phase().get();
    let b = coarse.phase().get();
    let diff = a.wrapping_sub(b) as i32;
    assert!(diff.abs() < 0x10000, "fine {:#x} vs coarse {:#x}", a, b);
}

#[test]
fn phase_accumulator_first_advance_records_time() {
    let mut acc = PhaseAccumulator::with_phase(
        MappedSignal::signed_unit(signal::ceiling()),
        BoundedAngle::QUARTER,
    );
    // The first observation never advances the phase.
    assert_eq!(acc.advance(5000).to_angle(), BoundedAngle::QUARTER);
}

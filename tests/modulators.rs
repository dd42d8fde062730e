// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use tiny_polar::signal;
use tiny_polar::{
    AngularModulator, BoundedAngle, CartesianMotionAccumulator, CartesianRange, FracQ16_16,
    LinearMotion, LinearRange, MappedSignal, RangeMode, ScalarMotion, ScalarRange, SFracQ0_16,
};

fn turns_per_sec(v: SFracQ0_16) -> MappedSignal<tiny_polar::SFracRange> {
    MappedSignal::signed_unit(signal::constant(v))
}

#[test]
fn angular_modulator_wraps_within_a_turn() {
    // A quarter turn per second from a quarter-turn start.
    let mut modulator = AngularModulator::new(
        turns_per_sec(SFracQ0_16::from_raw(16384)),
        BoundedAngle::QUARTER,
    );

    assert_eq!(modulator.advance(0), BoundedAngle::QUARTER);

    let mut t = 0u32;
    for _ in 0..10 {
        t += 100;
        modulator.advance(t);
    }
    // One second at 0.25 turn/s lands on the half turn.
    let angle = modulator.advance(t).get() as i32;
    assert!((angle - 0x8000).abs() < 300, "{:#x}", angle);
}

#[test]
fn linear_motion_moves_along_its_direction() {
    let speed = MappedSignal::new(
        signal::ceiling(),
        LinearRange::new(0i32, 10 << 16, RangeMode::UnsignedFromSigned),
    );
    let direction = AngularModulator::new(
        turns_per_sec(SFracQ0_16::ZERO),
        BoundedAngle::ZERO,
    );
    let mut motion = LinearMotion::new(speed, direction);

    motion.advance(0);
    let mut t = 0u32;
    for _ in 0..10 {
        t += 100;
        motion.advance(t);
    }

    let (x, y) = motion.position();
    // ~10 units/s for one second along +X.
    assert!((x.get() - (10 << 16)).abs() < (1 << 14), "x {}", x.get());
    assert!(y.get().abs() < (1 << 10), "y {}", y.get());
}

#[test]
fn bounded_linear_motion_respects_its_radius() {
    let speed = MappedSignal::new(
        signal::ceiling(),
        LinearRange::new(0i32, 100 << 16, RangeMode::UnsignedFromSigned),
    );
    let direction = AngularModulator::new(
        turns_per_sec(SFracQ0_16::ZERO),
        BoundedAngle::ZERO,
    );
    let max_radius = FracQ16_16::from_int(5);
    let mut motion = LinearMotion::new(speed, direction).bounded(max_radius);

    motion.advance(0);
    let mut t = 0u32;
    for _ in 0..40 {
        t += 100;
        motion.advance(t);
    }

    let (x, y) = motion.position();
    let dist_sq = x.get() as i64 * x.get() as i64 + y.get() as i64 * y.get() as i64;
    let max_sq = max_radius.get() as i64 * max_radius.get() as i64;
    assert!(dist_sq <= max_sq + (max_sq >> 8), "{} vs {}", dist_sq, max_sq);
}

#[test]
fn cartesian_motion_integrates_direction_and_velocity() {
    let mut acc = CartesianMotionAccumulator::new(
        CartesianRange::new(1000),
        MappedSignal::signed_unit(signal::constant(SFracQ0_16::ZERO)),
        MappedSignal::signed_unit(signal::constant(SFracQ0_16::from_raw(0x8000))),
    );

    acc.advance(0);
    let (x, y) = acc.advance(100);
    assert!(x > 0, "x {}", x);
    assert!(y.abs() <= 2, "y {}", y);
}

#[test]
fn same_time_resampling_is_idempotent_for_motion() {
    let mut acc = CartesianMotionAccumulator::new(
        CartesianRange::default(),
        MappedSignal::signed_unit(signal::constant(SFracQ0_16::ZERO)),
        MappedSignal::signed_unit(signal::ceiling()),
    );
    acc.advance(0);
    let first = acc.advance(100);
    let second = acc.advance(100);
    assert_eq!(first, second);
}

#[test]
fn scalar_motion_caches_the_latest_sample() {
    let mut motion = ScalarMotion::new(
        MappedSignal::new(signal::ceiling(), ScalarRange::unit()),
        tiny_polar::FracQ0_16::ZERO,
    );
    assert_eq!(motion.value().get(), 0);
    motion.advance_frame(0);
    assert_eq!(motion.value().get(), 0xFFFF);
}

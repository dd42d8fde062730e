// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use tiny_polar::signal;
use tiny_polar::{
    BoundedAngle, CartQ24_8, FracQ0_16, KaleidoscopeTransform, Layer, MirrorTransform,
    NoiseSource, Palette16, PatternNormU16, Pipeline, PipelineContext, PolarRange,
    RotationTransform, SFracQ0_16, TilingTransform, VortexTransform, ZoomTransform,
};

fn checker(x: u32, y: u32) -> PatternNormU16 {
    PatternNormU16::from_raw(((x >> 4) ^ (y >> 4)) as u16)
}

fn sample_points() -> Vec<(BoundedAngle, FracQ0_16)> {
    let mut points = Vec::new();
    for &angle in &[0u16, 5000, 16384, 30000, 44444, 60000] {
        for &radius in &[4000u16, 20000, 45000, 65000] {
            points.push((BoundedAngle::from_raw(angle), FracQ0_16::from_raw(radius)));
        }
    }
    points
}

fn noise_to_polar_layer() -> Layer {
    Layer::new(
        Pipeline::builder(NoiseSource::Custom(checker)).to_polar().build(),
        Palette16::RAINBOW,
    )
}

#[test]
fn zoom_at_scale_one_is_identity() {
    let mut identity = noise_to_polar_layer();
    let mut zoomed = Layer::new(
        Pipeline::builder(NoiseSource::Custom(checker))
            .cartesian(ZoomTransform::with_scale_range(
                signal::ceiling(),
                SFracQ0_16::ONE,
                SFracQ0_16::ONE,
            ))
            .to_polar()
            .build(),
        Palette16::RAINBOW,
    );

    identity.advance_frame(FracQ0_16::ZERO, 0);
    zoomed.advance_frame(FracQ0_16::ZERO, 0);

    for (angle, radius) in sample_points() {
        assert_eq!(
            zoomed.colour_at(angle, radius),
            identity.colour_at(angle, radius),
            "at ({}, {})",
            angle.get(),
            radius.get()
        );
    }
}

#[test]
fn rotation_at_zero_is_identity() {
    let mut identity = noise_to_polar_layer();
    let mut rotated = Layer::new(
        Pipeline::builder(NoiseSource::Custom(checker))
            .to_polar()
            .polar(RotationTransform::new(signal::midpoint()))
            .build(),
        Palette16::RAINBOW,
    );

    identity.advance_frame(FracQ0_16::ZERO, 0);
    rotated.advance_frame(FracQ0_16::ZERO, 0);

    for (angle, radius) in sample_points() {
        assert_eq!(
            rotated.colour_at(angle, radius),
            identity.colour_at(angle, radius)
        );
    }
}

#[test]
fn rotation_by_a_quarter_turn_rotates_the_pattern() {
    // A pinned quarter-turn offset via a degenerate range.
    let quarter = PolarRange::new(BoundedAngle::QUARTER, BoundedAngle::QUARTER);
    let mut rotated = Layer::new(
        Pipeline::builder(NoiseSource::Custom(checker))
            .to_polar()
            .polar(RotationTransform::with_range(signal::midpoint(), quarter))
            .build(),
        Palette16::RAINBOW,
    );
    let mut identity = noise_to_polar_layer();

    identity.advance_frame(FracQ0_16::ZERO, 0);
    rotated.advance_frame(FracQ0_16::ZERO, 0);

    for (angle, radius) in sample_points() {
        let shifted = angle.wrapping_add(BoundedAngle::QUARTER);
        assert_eq!(
            rotated.colour_at(angle, radius),
            identity.colour_at(shifted, radius)
        );
    }
}

#[test]
fn kaleidoscope_single_facet_is_identity() {
    let ctx = &mut PipelineContext::default();
    let mut k = KaleidoscopeTransform::new(1, false);
    k.advance_frame(0, ctx);
    for (angle, radius) in sample_points() {
        assert_eq!(k.map(angle, radius), (angle, radius));
    }
}

#[test]
fn kaleidoscope_folds_are_periodic() {
    let k = KaleidoscopeTransform::new(4, false);
    for (angle, radius) in sample_points() {
        let quarter_later = angle.wrapping_add(BoundedAngle::QUARTER);
        assert_eq!(k.map(angle, radius), k.map(quarter_later, radius));
    }
}

#[test]
fn mirrored_kaleidoscope_is_symmetric() {
    // Four mirrored facets: the output repeats every quarter turn and is
    // symmetric about each wedge boundary.
    let mut mirrored = Layer::new(
        Pipeline::builder(NoiseSource::Custom(checker))
            .to_polar()
            .polar(KaleidoscopeTransform::new(4, true))
            .build(),
        Palette16::RAINBOW,
    );
    mirrored.advance_frame(FracQ0_16::ZERO, 0);

    for &angle_raw in &[1000u16, 5000, 9000, 14000] {
        let radius = FracQ0_16::from_raw(40000);
        let here = mirrored.colour_at(BoundedAngle::from_raw(angle_raw), radius);

        // Four-fold rotational symmetry.
        let rotated = mirrored.colour_at(
            BoundedAngle::from_raw(angle_raw.wrapping_add(0x4000)),
            radius,
        );
        assert_eq!(here, rotated, "rotational at {}", angle_raw);

        // Mirror symmetry: θ and (0.5 − θ) agree.
        let reflected = mirrored.colour_at(
            BoundedAngle::from_raw(0x8000u16.wrapping_sub(angle_raw)),
            radius,
        );
        assert_eq!(here, reflected, "mirror at {}", angle_raw);
    }
}

#[test]
fn mandala_multiplies_the_angle() {
    let k = KaleidoscopeTransform::mandala(3);
    let radius = FracQ0_16::HALF;
    let (mapped, _) = k.map(BoundedAngle::from_raw(1000), radius);
    assert_eq!(mapped.get(), 3000);
    // Wraps modulo one turn.
    let (wrapped, _) = k.map(BoundedAngle::from_raw(30000), radius);
    assert_eq!(wrapped.get(), 90000u32 as u16);
}

#[test]
fn tiling_is_periodic_and_wraps_negatives() {
    let tile = CartQ24_8::from_int(10);
    let t = TilingTransform::new(tile, tile);
    let period = tile.get();

    for &x in &[0i32, 100, 2560, -1, -2560, 12345] {
        for &y in &[0i32, 77, -3000] {
            let (ax, ay) = t.map(CartQ24_8::from_raw(x), CartQ24_8::from_raw(y));
            let (bx, by) = t.map(
                CartQ24_8::from_raw(x.wrapping_add(period)),
                CartQ24_8::from_raw(y.wrapping_add(period)),
            );
            assert_eq!((ax, ay), (bx, by), "periodicity at ({}, {})", x, y);
            assert!(ax.get() >= 0 && ax.get() < period);
            assert!(ay.get() >= 0 && ay.get() < period);
        }
    }

    let (wrapped, _) = t.map(CartQ24_8::from_raw(-1), CartQ24_8::ZERO);
    assert_eq!(wrapped.get(), period - 1);
}

#[test]
fn mirror_reflects_selected_axes() {
    let m = MirrorTransform::new(true, false);
    let (x, y) = m.map(CartQ24_8::from_raw(-500), CartQ24_8::from_raw(-500));
    assert_eq!(x.get(), 500);
    assert_eq!(y.get(), -500);

    // The degenerate minimum saturates instead of overflowing.
    let (x, _) = m.map(CartQ24_8::from_raw(i32::MIN), CartQ24_8::ZERO);
    assert_eq!(x.get(), i32::MAX);
}

#[test]
fn vortex_offset_grows_with_radius() {
    let ctx = &mut PipelineContext::default();
    let mut v = VortexTransform::new(signal::ceiling());
    v.advance_frame(0, ctx);

    let base = BoundedAngle::ZERO;
    let (near, _) = v.map(base, FracQ0_16::from_raw(0x1000));
    let (far, _) = v.map(base, FracQ0_16::from_raw(0xF000));
    assert!(far.get() > near.get(), "{} vs {}", far.get(), near.get());

    // Zero radius is untouched.
    let (centre, _) = v.map(base, FracQ0_16::ZERO);
    assert_eq!(centre, base);
}

// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::cell::Cell;
use std::rc::Rc;

use tiny_polar::{
    BlendMode, BoundedAngle, DiscDisplaySpec, DisplaySpec, FracQ0_16, Layer, LoopingSceneProvider,
    NoiseSource, Palette16, PatternNormU16, Pipeline, Renderer, Rgb, Scene, SceneManager,
    SceneProvider,
};

fn flat_layer(intensity: u16, palette: Palette16) -> Layer {
    Layer::new(
        Pipeline::builder(NoiseSource::Constant(PatternNormU16::from_raw(intensity)))
            .to_polar()
            .build(),
        palette,
    )
}

struct CountingProvider {
    calls: Rc<Cell<u32>>,
    duration: u32,
}

impl SceneProvider for CountingProvider {
    fn next_scene(&mut self) -> Option<Scene> {
        self.calls.set(self.calls.get() + 1);
        Some(Scene::new(
            vec![flat_layer(0, Palette16::RAINBOW)],
            self.duration,
        ))
    }
}

#[test]
fn scene_loop_restarts_exactly_on_expiry() {
    let calls = Rc::new(Cell::new(0u32));
    let provider = CountingProvider {
        calls: calls.clone(),
        duration: 2000,
    };
    let mut manager = SceneManager::new(Box::new(provider));

    manager.advance_frame(0);
    assert_eq!(calls.get(), 1);
    assert_eq!(manager.scene_elapsed(0), Some(0));

    manager.advance_frame(1999);
    assert_eq!(calls.get(), 1);
    assert_eq!(manager.scene_elapsed(1999), Some(1999));

    manager.advance_frame(2000);
    assert_eq!(calls.get(), 2);
    assert_eq!(manager.scene_elapsed(2000), Some(0));

    manager.advance_frame(3999);
    assert_eq!(calls.get(), 2);
    assert_eq!(manager.scene_elapsed(3999), Some(1999));

    manager.advance_frame(4000);
    assert_eq!(calls.get(), 3);
    assert_eq!(manager.scene_elapsed(4000), Some(0));
}

#[test]
fn endless_scene_never_asks_for_another() {
    let calls = Rc::new(Cell::new(0u32));
    let provider = CountingProvider {
        calls: calls.clone(),
        duration: 0,
    };
    let mut manager = SceneManager::new(Box::new(provider));
    for t in (0u32..100_000).step_by(5000) {
        manager.advance_frame(t);
    }
    assert_eq!(calls.get(), 1);
}

struct EmptyProvider;

impl SceneProvider for EmptyProvider {
    fn next_scene(&mut self) -> Option<Scene> {
        None
    }
}

#[test]
fn missing_scene_renders_black() {
    let mut manager = SceneManager::new(Box::new(EmptyProvider));
    manager.advance_frame(0);
    let map = manager.build();
    assert_eq!(
        map.colour_at(BoundedAngle::ZERO, FracQ0_16::HALF),
        Rgb::BLACK
    );
}

#[test]
fn single_opaque_layer_passes_through() {
    // A scene holding one fully-opaque Normal layer reproduces the layer.
    let mut reference = flat_layer(0x8000, Palette16::RAINBOW);
    reference.advance_frame(FracQ0_16::ZERO, 0);

    let mut scene = Scene::endless(vec![flat_layer(0x8000, Palette16::RAINBOW)]);
    scene.advance_frame(FracQ0_16::ZERO, 0);

    let spec = DiscDisplaySpec;
    for i in 0..spec.n_leds() {
        let (angle, radius) = spec.to_polar(i);
        assert_eq!(
            scene.colour_at(angle, radius),
            reference.colour_at(angle, radius)
        );
    }
}

#[test]
fn additive_layer_sums_with_saturation() {
    let solid_a = Palette16::solid(Rgb::new(200, 20, 0));
    let solid_b = Palette16::solid(Rgb::new(100, 50, 5));

    let mut scene = Scene::endless(vec![
        flat_layer(0, solid_a),
        flat_layer(0, solid_b).with_blend_mode(BlendMode::Add),
    ]);
    scene.advance_frame(FracQ0_16::ZERO, 0);

    assert_eq!(
        scene.colour_at(BoundedAngle::ZERO, FracQ0_16::HALF),
        Rgb::new(255, 70, 5)
    );
}

#[test]
fn zero_alpha_layer_is_skipped() {
    let base = Palette16::solid(Rgb::new(10, 20, 30));
    let loud = Palette16::solid(Rgb::new(250, 250, 250));

    let mut scene = Scene::endless(vec![
        flat_layer(0, base),
        flat_layer(0, loud).with_alpha(FracQ0_16::ZERO),
    ]);
    scene.advance_frame(FracQ0_16::ZERO, 0);

    assert_eq!(
        scene.colour_at(BoundedAngle::ZERO, FracQ0_16::HALF),
        Rgb::new(10, 20, 30)
    );
}

#[test]
fn renderer_fills_exactly_the_display() {
    let spec = DiscDisplaySpec;
    let manager = SceneManager::new(Box::new(LoopingSceneProvider::new(|| {
        Scene::endless(vec![flat_layer(0, Palette16::RAINBOW)])
    })));
    let mut renderer = Renderer::new(&spec, manager);
    assert_eq!(renderer.n_leds(), spec.n_leds());

    let mut buffer = vec![Rgb::new(9, 9, 9); spec.n_leds() as usize];
    renderer.render(&mut buffer, 0);

    assert_eq!(buffer.len(), spec.n_leds() as usize);
    let red = Palette16::RAINBOW.entry(0);
    assert!(buffer.iter().all(|&px| px == red));

    // A second frame ticks time forward without disturbing the buffer size.
    renderer.render(&mut buffer, 33);
    assert_eq!(buffer.len(), spec.n_leds() as usize);
}

#[test]
fn renderer_output_is_driver_ready_bytes() {
    let spec = DiscDisplaySpec;
    let manager = SceneManager::new(Box::new(LoopingSceneProvider::new(|| {
        Scene::endless(vec![flat_layer(0, Palette16::solid(Rgb::new(1, 2, 3)))])
    })));
    let mut renderer = Renderer::new(&spec, manager);

    let mut buffer = vec![Rgb::BLACK; spec.n_leds() as usize];
    renderer.render(&mut buffer, 0);

    let bytes: &[u8] = bytemuck::cast_slice(&buffer);
    assert_eq!(bytes.len(), spec.n_leds() as usize * 3);
    assert_eq!(&bytes[0..3], &[1, 2, 3]);
}

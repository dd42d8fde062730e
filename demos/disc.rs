// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Renders the preset catalog against the 241-pixel disc and reports frame
//! timing. On real hardware the buffer would go to the LED driver instead.

use std::time::Instant;

use tiny_polar::{
    liquid_marble, DiscDisplaySpec, DisplaySpec, LoopingSceneProvider, Palette16, Renderer, Rgb,
    Scene, SceneManager,
};

const FRAME_MS: u32 = 33;
const FRAMES: u32 = 300;

fn main() {
    env_logger::init();

    let spec = DiscDisplaySpec;
    let manager = SceneManager::new(Box::new(LoopingSceneProvider::new(|| {
        Scene::new(vec![liquid_marble(Palette16::RAINBOW)], 10_000)
    })));
    let mut renderer = Renderer::new(&spec, manager);
    let mut buffer = vec![Rgb::BLACK; spec.n_leds() as usize];

    let started = Instant::now();
    let mut brightness_acc = 0u64;
    for frame in 0..FRAMES {
        renderer.render(&mut buffer, frame * FRAME_MS);
        brightness_acc += buffer
            .iter()
            .map(|px| px.r as u64 + px.g as u64 + px.b as u64)
            .sum::<u64>();
    }
    let elapsed = started.elapsed();

    let per_frame = elapsed.as_secs_f64() * 1000.0 / FRAMES as f64;
    let avg_brightness = brightness_acc / (FRAMES as u64 * buffer.len() as u64 * 3);
    println!(
        "{} frames over {} pixels: {:.3} ms/frame, mean channel {}",
        FRAMES,
        spec.n_leds(),
        per_frame,
        avg_brightness
    );
}

// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Renders one preset frame on a 32×32 matrix as ASCII brightness, which is
//! a cheap way to eyeball a pipeline without hardware.

use tiny_polar::{
    spiral_galaxy, DisplaySpec, LoopingSceneProvider, MatrixDisplaySpec, Palette16, Renderer, Rgb,
    Scene, SceneManager,
};

const RAMP: &[u8] = b" .:-=+*#%@";

fn main() {
    env_logger::init();

    let spec = MatrixDisplaySpec::new(32, 32);
    let manager = SceneManager::new(Box::new(LoopingSceneProvider::new(|| {
        Scene::endless(vec![spiral_galaxy(Palette16::RAINBOW)])
    })));
    let mut renderer = Renderer::new(&spec, manager);
    let mut buffer = vec![Rgb::BLACK; spec.n_leds() as usize];

    // A few warm-up frames let the smoothed transforms settle.
    for frame in 0..30u32 {
        renderer.render(&mut buffer, frame * 33);
    }

    for row in buffer.chunks(32) {
        let line: String = row
            .iter()
            .map(|px| {
                let luma = (px.r as u32 * 3 + px.g as u32 * 6 + px.b as u32) / 10;
                RAMP[(luma as usize * (RAMP.len() - 1)) / 255] as char
            })
            .collect();
        println!("{}", line);
    }
}

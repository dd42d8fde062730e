// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use alloc::vec::Vec;
use core::fmt;

use tiny_polar_math::{BoundedAngle, FracQ0_16, TimeMillis};

use crate::color::Rgb;
use crate::display::DisplaySpec;
use crate::scene::SceneManager;

/// Fills an RGB buffer from the scene manager, one sample per pixel.
///
/// The pixel→polar mapping is computed once at construction; the per-frame
/// path allocates nothing. The caller owns the frame cadence: call
/// [`render`](Renderer::render) every ~30 ms and hand the buffer to the LED
/// driver.
pub struct Renderer {
    coords: Vec<(BoundedAngle, FracQ0_16)>,
    manager: SceneManager,
}

impl Renderer {
    /// Creates a renderer for a display, caching its polar coordinates.
    pub fn new(spec: &dyn DisplaySpec, manager: SceneManager) -> Self {
        let n = spec.n_leds();
        let mut coords = Vec::with_capacity(n as usize);
        for i in 0..n {
            coords.push(spec.to_polar(i));
        }
        Renderer { coords, manager }
    }

    /// The display's pixel count.
    pub fn n_leds(&self) -> u16 {
        self.coords.len() as u16
    }

    /// The scene manager.
    pub fn scene_manager(&self) -> &SceneManager {
        &self.manager
    }

    /// The scene manager, mutably.
    pub fn scene_manager_mut(&mut self) -> &mut SceneManager {
        &mut self.manager
    }

    /// Renders one frame at `t` into `output`.
    ///
    /// Fills `min(output.len(), n_leds())` pixels in index order.
    pub fn render(&mut self, output: &mut [Rgb], t: TimeMillis) {
        self.manager.advance_frame(t);
        let map = self.manager.build();
        for (pixel, &(angle, radius)) in output.iter_mut().zip(self.coords.iter()) {
            *pixel = map.colour_at(angle, radius);
        }
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("n_leds", &self.coords.len())
            .field("manager", &self.manager)
            .finish()
    }
}

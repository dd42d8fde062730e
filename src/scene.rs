// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use tiny_polar_math::{BoundedAngle, FracQ0_16, TimeMillis};

use crate::blend_mode::blend;
use crate::color::Rgb;
use crate::layer::Layer;

/// An ordered stack of layers with a lifetime.
///
/// Layers composite bottom-up starting from black. A duration of zero means
/// the scene never expires.
#[derive(Debug)]
pub struct Scene {
    layers: Vec<Layer>,
    duration_ms: TimeMillis,
}

impl Scene {
    /// Creates a scene that expires after `duration_ms`.
    pub fn new(layers: Vec<Layer>, duration_ms: TimeMillis) -> Self {
        let duration_ms = if cfg!(feature = "debug-short-scenes") {
            duration_ms / 8
        } else {
            duration_ms
        };
        Scene {
            layers,
            duration_ms,
        }
    }

    /// Creates a scene that never expires.
    pub fn endless(layers: Vec<Layer>) -> Self {
        Scene {
            layers,
            duration_ms: 0,
        }
    }

    /// The scene's duration; zero means endless.
    pub fn duration(&self) -> TimeMillis {
        self.duration_ms
    }

    /// Whether the scene has run past its duration.
    pub fn is_expired(&self, elapsed_ms: TimeMillis) -> bool {
        self.duration_ms != 0 && elapsed_ms >= self.duration_ms
    }

    /// Ticks every layer with the scene-relative time.
    pub fn advance_frame(&mut self, progress: FracQ0_16, elapsed_ms: TimeMillis) {
        for layer in &mut self.layers {
            layer.advance_frame(progress, elapsed_ms);
        }
    }

    /// Composites all layers for one polar coordinate.
    pub fn colour_at(&self, angle: BoundedAngle, radius: FracQ0_16) -> Rgb {
        let mut result = Rgb::BLACK;
        for layer in &self.layers {
            if layer.alpha().get() == 0 {
                continue;
            }
            let colour = layer.colour_at(angle, radius);
            result = blend(result, colour, layer.alpha(), layer.blend_mode());
        }
        result
    }
}

/// A source of scenes for the [`SceneManager`].
///
/// Implementations choose the scheduling policy: random, sequential,
/// playlist. Returning `None` makes the manager render black until the next
/// expiry check.
pub trait SceneProvider {
    /// Produces the next scene to play.
    fn next_scene(&mut self) -> Option<Scene>;
}

/// The default provider: calls a factory closure, looping it forever.
pub struct LoopingSceneProvider<F: FnMut() -> Scene> {
    factory: F,
}

impl<F: FnMut() -> Scene> LoopingSceneProvider<F> {
    /// Creates a provider from a scene factory.
    pub fn new(factory: F) -> Self {
        LoopingSceneProvider { factory }
    }
}

impl<F: FnMut() -> Scene> SceneProvider for LoopingSceneProvider<F> {
    fn next_scene(&mut self) -> Option<Scene> {
        Some((self.factory)())
    }
}

impl<F: FnMut() -> Scene> fmt::Debug for LoopingSceneProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopingSceneProvider").finish()
    }
}

/// Owns the current scene and its provider; switches scenes on expiry.
///
/// Each frame: if the current scene has expired (or none exists yet), the
/// provider is asked for the next one and the new start time recorded; then
/// the current scene is advanced with its relative time and progress.
pub struct SceneManager {
    provider: Box<dyn SceneProvider>,
    current: Option<Scene>,
    scene_start_ms: TimeMillis,
}

impl SceneManager {
    /// Creates a manager over a provider.
    pub fn new(provider: Box<dyn SceneProvider>) -> Self {
        SceneManager {
            provider,
            current: None,
            scene_start_ms: 0,
        }
    }

    /// Advances the scene lifecycle and the current scene to `now`.
    pub fn advance_frame(&mut self, now: TimeMillis) {
        let expired = match &self.current {
            None => true,
            Some(scene) => scene.is_expired(now.wrapping_sub(self.scene_start_ms)),
        };
        if expired {
            self.current = self.provider.next_scene();
            self.scene_start_ms = now;
            if self.current.is_none() {
                log::warn!("scene provider returned no scene; rendering black");
            }
        }

        if let Some(scene) = &mut self.current {
            let elapsed = now.wrapping_sub(self.scene_start_ms);
            let duration = scene.duration();
            let progress = if duration == 0 {
                FracQ0_16::MAX
            } else {
                let clamped = elapsed.min(duration) as u64;
                FracQ0_16::from_raw(((clamped * 0xFFFF) / duration as u64) as u16)
            };
            scene.advance_frame(progress, elapsed);
        }
    }

    /// Milliseconds into the current scene, or `None` when no scene plays.
    pub fn scene_elapsed(&self, now: TimeMillis) -> Option<TimeMillis> {
        self.current
            .as_ref()
            .map(|_| now.wrapping_sub(self.scene_start_ms))
    }

    /// Publishes the current composited colour map.
    pub fn build(&self) -> ColourMap<'_> {
        ColourMap {
            scene: self.current.as_ref(),
        }
    }
}

impl fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneManager")
            .field("current", &self.current)
            .field("scene_start_ms", &self.scene_start_ms)
            .finish()
    }
}

/// The composited output of the current scene: a pure function from polar
/// coordinate to colour.
///
/// Safe to evaluate any number of times within a frame; all state mutation
/// happens in [`SceneManager::advance_frame`]. With no scene playing, every
/// coordinate is black.
#[derive(Copy, Clone, Debug)]
pub struct ColourMap<'a> {
    scene: Option<&'a Scene>,
}

impl ColourMap<'_> {
    /// Evaluates the colour for one polar coordinate.
    pub fn colour_at(&self, angle: BoundedAngle, radius: FracQ0_16) -> Rgb {
        match self.scene {
            Some(scene) => scene.colour_at(angle, radius),
            None => Rgb::BLACK,
        }
    }
}

// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use tiny_polar_math::FracQ0_16;

use crate::color::{lerp_rgb, Rgb};

/// How a layer's colour combines with everything below it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum BlendMode {
    /// Alpha-blend over the base.
    Normal,
    /// Per-channel sum, saturating at 255.
    Add,
    /// Per-channel product; darkens.
    Multiply,
    /// Inverted product of inverses; brightens.
    Screen,
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::Normal
    }
}

/// Combines `top` onto `base`.
///
/// `alpha` is a Q0.16 coverage whose upper byte drives the 8-bit per-channel
/// math; zero alpha leaves `base` untouched and a full alpha in `Normal`
/// mode replaces it exactly.
pub(crate) fn blend(base: Rgb, top: Rgb, alpha: FracQ0_16, mode: BlendMode) -> Rgb {
    let alpha_raw = alpha.get();
    if alpha_raw == 0 {
        return base;
    }
    let a8 = (alpha_raw >> 8) as u8;

    match mode {
        BlendMode::Normal => {
            if alpha_raw == 0xFFFF {
                top
            } else {
                lerp_rgb(base, top, a8)
            }
        }
        BlendMode::Add => {
            let top = scale_unless_opaque(top, alpha_raw, a8);
            Rgb {
                r: base.r.saturating_add(top.r),
                g: base.g.saturating_add(top.g),
                b: base.b.saturating_add(top.b),
            }
        }
        BlendMode::Multiply => {
            let top = scale_unless_opaque(top, alpha_raw, a8);
            Rgb {
                r: ((base.r as u16 * top.r as u16) / 255) as u8,
                g: ((base.g as u16 * top.g as u16) / 255) as u8,
                b: ((base.b as u16 * top.b as u16) / 255) as u8,
            }
        }
        BlendMode::Screen => {
            let top = scale_unless_opaque(top, alpha_raw, a8);
            Rgb {
                r: screen_channel(base.r, top.r),
                g: screen_channel(base.g, top.g),
                b: screen_channel(base.b, top.b),
            }
        }
    }
}

#[inline]
fn scale_unless_opaque(c: Rgb, alpha_raw: u16, a8: u8) -> Rgb {
    if alpha_raw == 0xFFFF {
        c
    } else {
        c.scaled(a8)
    }
}

#[inline]
fn screen_channel(base: u8, top: u8) -> u8 {
    255 - (((255 - base) as u16 * (255 - top) as u16) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_alpha_is_skipped() {
        let base = Rgb::new(10, 20, 30);
        let top = Rgb::new(200, 200, 200);
        for mode in [
            BlendMode::Normal,
            BlendMode::Add,
            BlendMode::Multiply,
            BlendMode::Screen,
        ] {
            assert_eq!(blend(base, top, FracQ0_16::ZERO, mode), base);
        }
    }

    #[test]
    fn opaque_normal_replaces() {
        let base = Rgb::new(10, 20, 30);
        let top = Rgb::new(200, 100, 50);
        assert_eq!(blend(base, top, FracQ0_16::MAX, BlendMode::Normal), top);
    }

    #[test]
    fn opaque_add_is_saturating_sum() {
        let base = Rgb::new(200, 20, 0);
        let top = Rgb::new(100, 50, 5);
        assert_eq!(
            blend(base, top, FracQ0_16::MAX, BlendMode::Add),
            Rgb::new(255, 70, 5)
        );
    }

    #[test]
    fn multiply_and_screen_identities() {
        let base = Rgb::new(100, 150, 200);
        let white = Rgb::new(255, 255, 255);
        assert_eq!(blend(base, white, FracQ0_16::MAX, BlendMode::Multiply), base);
        assert_eq!(
            blend(base, Rgb::BLACK, FracQ0_16::MAX, BlendMode::Screen),
            base
        );
    }
}

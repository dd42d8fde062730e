// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use tiny_polar_math::{bound, cartesian_to_polar, scale_i32_by_bounded, BoundedAngle, FracQ0_16};

/// The mapping from physical LED index to the unit polar disc.
///
/// The renderer treats this as an external collaborator: it only needs the
/// pixel count and the per-pixel polar coordinate.
pub trait DisplaySpec {
    /// Total pixel count.
    fn n_leds(&self) -> u16;

    /// Number of layout segments (rings for a disc, rows for a matrix).
    fn n_segments(&self) -> u16;

    /// Pixels in one segment.
    fn segment_size(&self, segment_index: u16) -> u16;

    /// The polar coordinate of one pixel.
    fn to_polar(&self, pixel_index: u16) -> (BoundedAngle, FracQ0_16);
}

/// A 241-pixel disc of nine concentric rings.
///
/// Ring sizes from the centre out: 1, 8, 12, 16, 24, 32, 40, 48, 60. The
/// angle is the pixel's proportional position within its ring; the radius is
/// the ring index over the outermost ring. The centre pixel is
/// `(angle 0, radius 0)`.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiscDisplaySpec;

impl DiscDisplaySpec {
    const RING_SIZES: [u16; 9] = [1, 8, 12, 16, 24, 32, 40, 48, 60];
    /// Total pixel count of the disc.
    pub const N_LEDS: u16 = 241;
}

impl DisplaySpec for DiscDisplaySpec {
    fn n_leds(&self) -> u16 {
        Self::N_LEDS
    }

    fn n_segments(&self) -> u16 {
        Self::RING_SIZES.len() as u16
    }

    fn segment_size(&self, segment_index: u16) -> u16 {
        Self::RING_SIZES
            .get(segment_index as usize)
            .copied()
            .unwrap_or(0)
    }

    fn to_polar(&self, pixel_index: u16) -> (BoundedAngle, FracQ0_16) {
        let mut cumulative = 0u16;
        let n_rings = Self::RING_SIZES.len() as u32;

        for (ring_index, &ring_size) in Self::RING_SIZES.iter().enumerate() {
            if pixel_index < cumulative + ring_size {
                let pixel_in_ring = (pixel_index - cumulative) as u32;
                let angle_step = if ring_size > 1 {
                    0x10000u32 / ring_size as u32
                } else {
                    0
                };
                let angle = BoundedAngle::from_raw((pixel_in_ring * angle_step) as u16);
                let radius =
                    FracQ0_16::from_ratio(ring_index as u32, n_rings - 1);
                return (angle, radius);
            }
            cumulative += ring_size;
        }

        (BoundedAngle::ZERO, FracQ0_16::ZERO)
    }
}

/// A rectangular matrix remapped onto the unit disc.
///
/// Pixels are centred, normalized to `[-1, 1]²`, scaled by 1/√2 so the
/// inscribed unit circle matches the panel's diagonal, and converted to
/// polar. Row 0 is the top of the panel.
#[derive(Copy, Clone, Debug)]
pub struct MatrixDisplaySpec {
    width: u16,
    height: u16,
}

impl MatrixDisplaySpec {
    // 1/sqrt(2) in Q0.16.
    const DIAGONAL_SCALE: FracQ0_16 = FracQ0_16::from_raw(46341);
    /// The largest supported edge length.
    pub const MAX_EDGE: u16 = 128;

    /// Creates a matrix spec; edges clamp to `1..=MAX_EDGE`.
    pub fn new(width: u16, height: u16) -> Self {
        MatrixDisplaySpec {
            width: bound(1, width, Self::MAX_EDGE),
            height: bound(1, height, Self::MAX_EDGE),
        }
    }
}

impl DisplaySpec for MatrixDisplaySpec {
    fn n_leds(&self) -> u16 {
        self.width * self.height
    }

    fn n_segments(&self) -> u16 {
        self.height
    }

    fn segment_size(&self, _segment_index: u16) -> u16 {
        self.width
    }

    fn to_polar(&self, pixel_index: u16) -> (BoundedAngle, FracQ0_16) {
        if pixel_index >= self.n_leds() {
            return (BoundedAngle::ZERO, FracQ0_16::ZERO);
        }

        let x = (pixel_index % self.width) as i32;
        let y = (pixel_index / self.width) as i32;
        let w = self.width as i32;
        let h = self.height as i32;

        let centered_x = x * 2 - (w - 1);
        let centered_y = (h - 1 - y) * 2 - (h - 1);

        let denom_x = (w - 1).max(1);
        let denom_y = (h - 1).max(1);

        // Q0.16 in [-1, 1], then pulled in so the corner lands at radius 1.
        let x_q0_16 = centered_x * 65536 / denom_x;
        let y_q0_16 = centered_y * 65536 / denom_y;
        let scaled_x = scale_i32_by_bounded(x_q0_16, Self::DIAGONAL_SCALE);
        let scaled_y = scale_i32_by_bounded(y_q0_16, Self::DIAGONAL_SCALE);

        // Into the i16 trig domain: ±1.0 → ±32767.
        let (phase, radius) = cartesian_to_polar(scaled_x / 2, scaled_y / 2);
        (phase.to_angle(), radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disc_ring_sizes_sum_to_total() {
        let spec = DiscDisplaySpec;
        let total: u16 = (0..spec.n_segments()).map(|i| spec.segment_size(i)).sum();
        assert_eq!(total, spec.n_leds());
    }

    #[test]
    fn disc_centre_pixel() {
        let spec = DiscDisplaySpec;
        assert_eq!(spec.to_polar(0), (BoundedAngle::ZERO, FracQ0_16::ZERO));
    }

    #[test]
    fn disc_outer_ring_spans_the_turn() {
        let spec = DiscDisplaySpec;
        let first_outer = 241 - 60;
        let (angle, radius) = spec.to_polar(first_outer);
        assert_eq!(angle, BoundedAngle::ZERO);
        assert_eq!(radius, FracQ0_16::MAX);

        // Ring 1 has 8 pixels, so two pixels in is a quarter turn exactly.
        let (angle, _) = spec.to_polar(1 + 2);
        assert_eq!(angle, BoundedAngle::QUARTER);
    }

    #[test]
    fn matrix_corner_touches_unit_circle() {
        let spec = MatrixDisplaySpec::new(16, 16);
        let (_, radius) = spec.to_polar(0);
        assert!(radius.get() > 62000, "{}", radius.get());

        // The centre-most pixels are well inside.
        let centre = 8 * 16 + 8;
        let (_, radius) = spec.to_polar(centre);
        assert!(radius.get() < 10000, "{}", radius.get());
    }
}

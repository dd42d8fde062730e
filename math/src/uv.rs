// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use bytemuck::{Pod, Zeroable};

use crate::FracQ16_16;

/// A 2D spatial coordinate for pattern evaluation.
///
/// Components are signed Q16.16 so tiling and zoom can push them past 1.0
/// without losing sub-pixel precision.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Pod, Zeroable)]
pub struct UV {
    /// Horizontal component.
    pub u: FracQ16_16,
    /// Vertical component.
    pub v: FracQ16_16,
}

impl UV {
    /// The origin.
    pub const ZERO: Self = UV {
        u: FracQ16_16::ZERO,
        v: FracQ16_16::ZERO,
    };

    /// Creates a coordinate from its components.
    #[inline]
    pub const fn new(u: FracQ16_16, v: FracQ16_16) -> Self {
        UV { u, v }
    }

    /// Creates a coordinate from raw Q16.16 components.
    #[inline]
    pub const fn from_raw(u: i32, v: i32) -> Self {
        UV {
            u: FracQ16_16::from_raw(u),
            v: FracQ16_16::from_raw(v),
        }
    }
}

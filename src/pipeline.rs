// Copyright 2025 the tiny-polar developers
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use arrayvec::ArrayVec;

use tiny_polar_math::{
    cartesian_to_polar, inoise16, normalise_noise, polar_to_cartesian, BoundedAngle, CartQ24_8,
    FracQ0_16, PatternNormU16, TimeMillis, UV,
};

use crate::layer::PipelineContext;
use crate::transform::{
    AnisotropicScaleTransform, BendTransform, CurlFlowTransform, DomainWarpTransform,
    KaleidoscopeTransform, LensDistortionTransform, MirrorTransform, NoiseWarpTransform,
    PaletteTransform, PerspectiveWarpTransform, PosterizePolarTransform, RadialScaleTransform,
    RotationTransform, ShearTransform, TileJitterTransform, TilingTransform, TranslationTransform,
    VortexTransform, ZoomTransform,
};

/// The most steps a pipeline can hold. More than enough.
pub const MAX_PIPELINE_STEPS: usize = 32;

/// Shifts the signed Cartesian plane into the noise sampler's unsigned
/// domain; negative coordinates wrap around the lattice rather than
/// clustering at zero.
pub const NOISE_DOMAIN_OFFSET: u32 = 0x8000_0000;

/// The pattern source at the root of every pipeline.
///
/// A source is a pure function of unsigned lattice coordinates; the pipeline
/// applies [`NOISE_DOMAIN_OFFSET`] before sampling it.
#[derive(Copy, Clone, Debug)]
pub enum NoiseSource {
    /// Plain value noise.
    Noise,
    /// Octave-summed value noise (fractal Brownian motion).
    Fbm(u8),
    /// Folded noise magnitude; sharp creases at the zero crossings.
    Turbulence,
    /// Inverted turbulence; bright ridges on the creases.
    Ridged,
    /// A constant intensity. Useful for flat layers and tests.
    Constant(PatternNormU16),
    /// A caller-supplied sampler.
    Custom(fn(u32, u32) -> PatternNormU16),
}

impl NoiseSource {
    /// Samples the source at unsigned lattice coordinates.
    pub fn sample(&self, x: u32, y: u32) -> PatternNormU16 {
        match *self {
            NoiseSource::Noise => normalise_noise(inoise16(x, y)),
            NoiseSource::Fbm(octaves) => {
                let octaves = octaves.clamp(1, 6);
                let mut acc = 0u32;
                let mut amplitude = 0x8000u32;
                let mut fx = x;
                let mut fy = y;
                for _ in 0..octaves {
                    let n = normalise_noise(inoise16(fx, fy)).get() as u32;
                    acc += (n * amplitude) >> 16;
                    fx = fx.wrapping_shl(1);
                    fy = fy.wrapping_shl(1);
                    amplitude >>= 1;
                }
                PatternNormU16::from_raw(acc.min(0xFFFF) as u16)
            }
            NoiseSource::Turbulence => {
                let n = normalise_noise(inoise16(x, y)).get() as i32 - 0x8000;
                let mag = n.unsigned_abs().min(0x7FFF);
                PatternNormU16::from_raw((mag << 1) as u16)
            }
            NoiseSource::Ridged => {
                let n = normalise_noise(inoise16(x, y)).get() as i32 - 0x8000;
                let mag = n.unsigned_abs().min(0x7FFF);
                PatternNormU16::from_raw(0xFFFF - (mag << 1) as u16)
            }
            NoiseSource::Constant(v) => v,
            NoiseSource::Custom(f) => f(x, y),
        }
    }
}

/// A transform step over the Cartesian domain.
#[derive(Debug)]
pub enum CartesianStep {
    /// See [`ZoomTransform`].
    Zoom(ZoomTransform),
    /// See [`TranslationTransform`].
    Translation(TranslationTransform),
    /// See [`DomainWarpTransform`].
    DomainWarp(DomainWarpTransform),
    /// See [`TilingTransform`].
    Tiling(TilingTransform),
    /// See [`MirrorTransform`].
    Mirror(MirrorTransform),
    /// See [`ShearTransform`].
    Shear(ShearTransform),
    /// See [`BendTransform`].
    Bend(BendTransform),
    /// See [`AnisotropicScaleTransform`].
    AnisotropicScale(AnisotropicScaleTransform),
    /// See [`PerspectiveWarpTransform`].
    Perspective(PerspectiveWarpTransform),
    /// See [`NoiseWarpTransform`].
    NoiseWarp(NoiseWarpTransform),
    /// See [`TileJitterTransform`].
    TileJitter(TileJitterTransform),
    /// See [`CurlFlowTransform`].
    CurlFlow(CurlFlowTransform),
}

impl CartesianStep {
    fn advance_frame(&mut self, t: TimeMillis, ctx: &mut PipelineContext) {
        match self {
            CartesianStep::Zoom(s) => s.advance_frame(t, ctx),
            CartesianStep::Translation(s) => s.advance_frame(t, ctx),
            CartesianStep::DomainWarp(s) => s.advance_frame(t, ctx),
            CartesianStep::Tiling(s) => s.advance_frame(t, ctx),
            CartesianStep::Mirror(s) => s.advance_frame(t, ctx),
            CartesianStep::Shear(s) => s.advance_frame(t, ctx),
            CartesianStep::Bend(s) => s.advance_frame(t, ctx),
            CartesianStep::AnisotropicScale(s) => s.advance_frame(t, ctx),
            CartesianStep::Perspective(s) => s.advance_frame(t, ctx),
            CartesianStep::NoiseWarp(s) => s.advance_frame(t, ctx),
            CartesianStep::TileJitter(s) => s.advance_frame(t, ctx),
            CartesianStep::CurlFlow(s) => s.advance_frame(t, ctx),
        }
    }

    fn map(&self, x: CartQ24_8, y: CartQ24_8) -> (CartQ24_8, CartQ24_8) {
        match self {
            CartesianStep::Zoom(s) => s.map(x, y),
            CartesianStep::Translation(s) => s.map(x, y),
            CartesianStep::DomainWarp(s) => s.map(x, y),
            CartesianStep::Tiling(s) => s.map(x, y),
            CartesianStep::Mirror(s) => s.map(x, y),
            CartesianStep::Shear(s) => s.map(x, y),
            CartesianStep::Bend(s) => s.map(x, y),
            CartesianStep::AnisotropicScale(s) => s.map(x, y),
            CartesianStep::Perspective(s) => s.map(x, y),
            CartesianStep::NoiseWarp(s) => s.map(x, y),
            CartesianStep::TileJitter(s) => s.map(x, y),
            CartesianStep::CurlFlow(s) => s.map(x, y),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CartesianStep::Zoom(_) => "Zoom",
            CartesianStep::Translation(_) => "Translation",
            CartesianStep::DomainWarp(_) => "DomainWarp",
            CartesianStep::Tiling(_) => "Tiling",
            CartesianStep::Mirror(_) => "Mirror",
            CartesianStep::Shear(_) => "Shear",
            CartesianStep::Bend(_) => "Bend",
            CartesianStep::AnisotropicScale(_) => "AnisotropicScale",
            CartesianStep::Perspective(_) => "Perspective",
            CartesianStep::NoiseWarp(_) => "NoiseWarp",
            CartesianStep::TileJitter(_) => "TileJitter",
            CartesianStep::CurlFlow(_) => "CurlFlow",
        }
    }
}

/// A transform step over the polar domain.
#[derive(Debug)]
pub enum PolarStep {
    /// See [`RotationTransform`].
    Rotation(RotationTransform),
    /// See [`KaleidoscopeTransform`].
    Kaleidoscope(KaleidoscopeTransform),
    /// See [`VortexTransform`].
    Vortex(VortexTransform),
    /// See [`LensDistortionTransform`].
    LensDistortion(LensDistortionTransform),
    /// See [`RadialScaleTransform`].
    RadialScale(RadialScaleTransform),
    /// See [`PosterizePolarTransform`].
    Posterize(PosterizePolarTransform),
}

impl PolarStep {
    fn advance_frame(&mut self, t: TimeMillis, ctx: &mut PipelineContext) {
        match self {
            PolarStep::Rotation(s) => s.advance_frame(t, ctx),
            PolarStep::Kaleidoscope(s) => s.advance_frame(t, ctx),
            PolarStep::Vortex(s) => s.advance_frame(t, ctx),
            PolarStep::LensDistortion(s) => s.advance_frame(t, ctx),
            PolarStep::RadialScale(s) => s.advance_frame(t, ctx),
            PolarStep::Posterize(s) => s.advance_frame(t, ctx),
        }
    }

    fn map(&self, angle: BoundedAngle, radius: FracQ0_16) -> (BoundedAngle, FracQ0_16) {
        match self {
            PolarStep::Rotation(s) => s.map(angle, radius),
            PolarStep::Kaleidoscope(s) => s.map(angle, radius),
            PolarStep::Vortex(s) => s.map(angle, radius),
            PolarStep::LensDistortion(s) => s.map(angle, radius),
            PolarStep::RadialScale(s) => s.map(angle, radius),
            PolarStep::Posterize(s) => s.map(angle, radius),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PolarStep::Rotation(_) => "Rotation",
            PolarStep::Kaleidoscope(_) => "Kaleidoscope",
            PolarStep::Vortex(_) => "Vortex",
            PolarStep::LensDistortion(_) => "LensDistortion",
            PolarStep::RadialScale(_) => "RadialScale",
            PolarStep::Posterize(_) => "Posterize",
        }
    }
}

/// A transform step over the UV domain.
#[derive(Debug)]
pub enum UvStep {
    /// See [`ZoomTransform`].
    Zoom(ZoomTransform),
    /// See [`TranslationTransform`].
    Translation(TranslationTransform),
}

impl UvStep {
    fn advance_frame(&mut self, t: TimeMillis, ctx: &mut PipelineContext) {
        match self {
            UvStep::Zoom(s) => s.advance_frame(t, ctx),
            UvStep::Translation(s) => s.advance_frame(t, ctx),
        }
    }

    fn map(&self, uv: UV) -> UV {
        match self {
            UvStep::Zoom(s) => s.map_uv(uv),
            UvStep::Translation(s) => s.map_uv(uv),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            UvStep::Zoom(_) => "Zoom",
            UvStep::Translation(_) => "Translation",
        }
    }
}

/// One entry in a pipeline's ordered step list.
#[derive(Debug)]
pub enum PipelineStep {
    /// A Cartesian-domain transform.
    Cartesian(CartesianStep),
    /// A polar-domain transform.
    Polar(PolarStep),
    /// A UV-domain transform.
    Uv(UvStep),
    /// Convert the current polar layer to Cartesian.
    ToCartesian,
    /// Convert the current UV layer back to Cartesian.
    UvToCartesian,
    /// Convert the current Cartesian layer to polar.
    ToPolar,
    /// Convert the current Cartesian layer to UV.
    ToUv,
    /// A palette drive; affects the context, not the coordinates.
    Palette(PaletteTransform),
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Domain {
    Cartesian,
    Polar,
    Uv,
}

enum Coord {
    Polar(BoundedAngle, FracQ0_16),
    Cart(i32, i32),
    Uv(UV),
}

/// An ordered chain of transforms over a noise source.
///
/// Built once per layer and ticked every frame; evaluation walks the chain
/// backwards per pixel, carrying the coordinate through domain conversions
/// down to the source. The chain always starts Cartesian (the source) and
/// must end polar.
#[derive(Debug)]
pub struct Pipeline {
    source: NoiseSource,
    steps: ArrayVec<PipelineStep, MAX_PIPELINE_STEPS>,
}

impl Pipeline {
    /// Starts building a pipeline from a source.
    pub fn builder(source: NoiseSource) -> PipelineBuilder {
        PipelineBuilder {
            source,
            steps: ArrayVec::new(),
        }
    }

    /// Validates the domain state machine, returning the offending step's
    /// description on a mismatch.
    pub(crate) fn check_domains(&self) -> Result<(), &'static str> {
        let mut domain = Domain::Cartesian;
        for step in &self.steps {
            match step {
                PipelineStep::Cartesian(s) => {
                    if domain != Domain::Cartesian {
                        return Err(s.name());
                    }
                }
                PipelineStep::Polar(s) => {
                    if domain != Domain::Polar {
                        return Err(s.name());
                    }
                }
                PipelineStep::Uv(s) => {
                    if domain != Domain::Uv {
                        return Err(s.name());
                    }
                }
                PipelineStep::ToPolar => {
                    if domain != Domain::Cartesian {
                        return Err("ToPolar");
                    }
                    domain = Domain::Polar;
                }
                PipelineStep::ToCartesian => {
                    if domain != Domain::Polar {
                        return Err("ToCartesian");
                    }
                    domain = Domain::Cartesian;
                }
                PipelineStep::UvToCartesian => {
                    if domain != Domain::Uv {
                        return Err("UvToCartesian");
                    }
                    domain = Domain::Cartesian;
                }
                PipelineStep::ToUv => {
                    if domain != Domain::Cartesian {
                        return Err("ToUv");
                    }
                    domain = Domain::Uv;
                }
                PipelineStep::Palette(_) => {}
            }
        }
        if domain != Domain::Polar {
            return Err("missing final polar layer");
        }
        Ok(())
    }

    /// Ticks every transform in registration order.
    ///
    /// Order matters: zoom publishes the normalized scale that translation
    /// smoothing reads, and the palette transform runs wherever it was
    /// registered — conventionally last.
    pub fn advance_frame(&mut self, t: TimeMillis, ctx: &mut PipelineContext) {
        for step in &mut self.steps {
            match step {
                PipelineStep::Cartesian(s) => s.advance_frame(t, ctx),
                PipelineStep::Polar(s) => s.advance_frame(t, ctx),
                PipelineStep::Uv(s) => s.advance_frame(t, ctx),
                PipelineStep::Palette(s) => s.advance_frame(t, ctx),
                PipelineStep::ToCartesian
                | PipelineStep::UvToCartesian
                | PipelineStep::ToPolar
                | PipelineStep::ToUv => {}
            }
        }
    }

    /// Evaluates the pattern intensity for one polar coordinate.
    ///
    /// Pure with respect to transform state; only `advance_frame` mutates.
    /// Must only be called on a pipeline whose domains checked out — the
    /// layer guards this and renders black otherwise.
    pub(crate) fn pattern_at(&self, angle: BoundedAngle, radius: FracQ0_16) -> PatternNormU16 {
        let mut coord = Coord::Polar(angle, radius);

        for step in self.steps.iter().rev() {
            coord = match (step, coord) {
                (PipelineStep::Palette(_), c) => c,
                (PipelineStep::Polar(s), Coord::Polar(a, r)) => {
                    let (a, r) = s.map(a, r);
                    Coord::Polar(a, r)
                }
                (PipelineStep::Cartesian(s), Coord::Cart(x, y)) => {
                    let (x, y) = s.map(CartQ24_8::from_raw(x), CartQ24_8::from_raw(y));
                    Coord::Cart(x.get(), y.get())
                }
                (PipelineStep::Uv(s), Coord::Uv(uv)) => Coord::Uv(s.map(uv)),
                // Sampling runs the build order in reverse, so each
                // conversion applies its inverse direction here.
                (PipelineStep::ToPolar, Coord::Polar(a, r)) => {
                    let (x, y) = polar_to_cartesian(a.to_phase(), r);
                    Coord::Cart(x, y)
                }
                (PipelineStep::ToCartesian, Coord::Cart(x, y)) => {
                    let (phase, r) = cartesian_to_polar(x, y);
                    Coord::Polar(phase.to_angle(), r)
                }
                (PipelineStep::UvToCartesian, Coord::Cart(x, y)) => {
                    Coord::Uv(UV::from_raw(x.wrapping_shl(8), y.wrapping_shl(8)))
                }
                (PipelineStep::ToUv, Coord::Uv(uv)) => {
                    Coord::Cart(uv.u.get() >> 8, uv.v.get() >> 8)
                }
                (_, _) => return PatternNormU16::ZERO,
            };
        }

        match coord {
            Coord::Cart(x, y) => {
                let ux = (x as u32).wrapping_add(NOISE_DOMAIN_OFFSET);
                let uy = (y as u32).wrapping_add(NOISE_DOMAIN_OFFSET);
                self.source.sample(ux, uy)
            }
            _ => PatternNormU16::ZERO,
        }
    }
}

/// Assembles a [`Pipeline`] step by step.
///
/// Steps past [`MAX_PIPELINE_STEPS`] are dropped with a logged warning; the
/// resulting pipeline then fails its domain check instead of panicking.
#[derive(Debug)]
pub struct PipelineBuilder {
    source: NoiseSource,
    steps: ArrayVec<PipelineStep, MAX_PIPELINE_STEPS>,
}

impl PipelineBuilder {
    fn push(mut self, step: PipelineStep) -> Self {
        if self.steps.try_push(step).is_err() {
            log::warn!("pipeline step limit ({}) exceeded; step dropped", MAX_PIPELINE_STEPS);
        }
        self
    }

    /// Appends a Cartesian-domain transform.
    pub fn cartesian(self, step: impl Into<CartesianStep>) -> Self {
        self.push(PipelineStep::Cartesian(step.into()))
    }

    /// Appends a polar-domain transform.
    pub fn polar(self, step: impl Into<PolarStep>) -> Self {
        self.push(PipelineStep::Polar(step.into()))
    }

    /// Appends a UV-domain transform.
    pub fn uv(self, step: impl Into<UvStep>) -> Self {
        self.push(PipelineStep::Uv(step.into()))
    }

    /// Appends a Cartesian → polar conversion.
    pub fn to_polar(self) -> Self {
        self.push(PipelineStep::ToPolar)
    }

    /// Appends a polar → Cartesian conversion.
    pub fn to_cartesian(self) -> Self {
        self.push(PipelineStep::ToCartesian)
    }

    /// Appends a UV → Cartesian conversion.
    pub fn uv_to_cartesian(self) -> Self {
        self.push(PipelineStep::UvToCartesian)
    }

    /// Appends a Cartesian → UV conversion.
    pub fn to_uv(self) -> Self {
        self.push(PipelineStep::ToUv)
    }

    /// Appends a palette drive.
    pub fn palette(self, step: PaletteTransform) -> Self {
        self.push(PipelineStep::Palette(step))
    }

    /// Finishes the pipeline.
    pub fn build(self) -> Pipeline {
        Pipeline {
            source: self.source,
            steps: self.steps,
        }
    }
}

macro_rules! impl_into_step {
    ($enum:ident :: $variant:ident ( $t:ty )) => {
        impl From<$t> for $enum {
            fn from(t: $t) -> Self {
                $enum::$variant(t)
            }
        }
    };
}

impl_into_step!(CartesianStep::Zoom(ZoomTransform));
impl_into_step!(CartesianStep::Translation(TranslationTransform));
impl_into_step!(CartesianStep::DomainWarp(DomainWarpTransform));
impl_into_step!(CartesianStep::Tiling(TilingTransform));
impl_into_step!(CartesianStep::Mirror(MirrorTransform));
impl_into_step!(CartesianStep::Shear(ShearTransform));
impl_into_step!(CartesianStep::Bend(BendTransform));
impl_into_step!(CartesianStep::AnisotropicScale(AnisotropicScaleTransform));
impl_into_step!(CartesianStep::Perspective(PerspectiveWarpTransform));
impl_into_step!(CartesianStep::NoiseWarp(NoiseWarpTransform));
impl_into_step!(CartesianStep::TileJitter(TileJitterTransform));
impl_into_step!(CartesianStep::CurlFlow(CurlFlowTransform));

impl_into_step!(UvStep::Zoom(ZoomTransform));
impl_into_step!(UvStep::Translation(TranslationTransform));

impl_into_step!(PolarStep::Rotation(RotationTransform));
impl_into_step!(PolarStep::Kaleidoscope(KaleidoscopeTransform));
impl_into_step!(PolarStep::Vortex(VortexTransform));
impl_into_step!(PolarStep::LensDistortion(LensDistortionTransform));
impl_into_step!(PolarStep::RadialScale(RadialScaleTransform));
impl_into_step!(PolarStep::Posterize(PosterizePolarTransform));

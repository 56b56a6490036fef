// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::core::phase::{HenyeyGreenstein, PhaseSample};
use crate::core::rng::LcgRng;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::media::heterogeneous_medium::HeterogeneousMedium;
use crate::media::homogeneous_medium::HomogeneousMedium;

const SIGMA_T_REL_TOLERANCE: Float = 1e-4;

/// Result of free-flight sampling along `[0, ray.max_t]`. When `interacted`
/// is false, `t` is the end of the segment (or where tracking stopped).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediumSample {
    pub t: Float,
    pub interacted: bool,
    pub weight: RGBSpectrum,
}

pub(crate) fn validate_coefficients(sigma_a: &RGBSpectrum,
                                    sigma_s: &RGBSpectrum,
                                    sigma_t: &RGBSpectrum) -> Result<()> {
    for (name, s) in [("sigma_a", sigma_a), ("sigma_s", sigma_s), ("sigma_t", sigma_t)].iter() {
        if !s.is_finite() || s.min_component() < 0.0 {
            return Err(RenderError::InvalidMedium(
                format!("{} must be finite and non-negative, got {:?}", name, s.to_vector())));
        }
    }
    for c in 0..3 {
        let sum = sigma_a[c] + sigma_s[c];
        if (sigma_t[c] - sum).abs() > SIGMA_T_REL_TOLERANCE * sigma_t[c].max(sum).max(1.0) {
            return Err(RenderError::InvalidMedium(
                format!("sigma_t[{}] = {} differs from sigma_a + sigma_s = {}", c, sigma_t[c], sum)));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediumKind {
    Homogeneous(HomogeneousMedium),
    Heterogeneous(HeterogeneousMedium),
}

/// Participating medium: a coefficient model plus its phase function.
/// Owned by the scene; objects refer to it by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Medium {
    kind: MediumKind,
    phase: HenyeyGreenstein,
}

impl Medium {
    /// `g` must lie strictly inside `(-1, 1)`.
    pub fn new(kind: MediumKind, g: Float) -> Result<Self> {
        if !(g > -1.0 && g < 1.0) {
            return Err(RenderError::InvalidMedium(format!("anisotropy g = {} is outside (-1, 1)", g)));
        }
        Ok(Self { kind, phase: HenyeyGreenstein::new(g) })
    }

    pub fn homogeneous(medium: HomogeneousMedium, g: Float) -> Result<Self> {
        Self::new(MediumKind::Homogeneous(medium), g)
    }

    pub fn heterogeneous(medium: HeterogeneousMedium, g: Float) -> Result<Self> {
        Self::new(MediumKind::Heterogeneous(medium), g)
    }

    pub fn kind(&self) -> &MediumKind {
        &self.kind
    }

    pub fn phase(&self) -> &HenyeyGreenstein {
        &self.phase
    }

    pub fn g(&self) -> Float {
        self.phase.g()
    }

    pub fn sigma_t(&self) -> RGBSpectrum {
        match &self.kind {
            MediumKind::Homogeneous(m) => m.sigma_t(),
            MediumKind::Heterogeneous(m) => m.sigma_t(),
        }
    }

    /// Transmittance over `[0, ray.max_t]`. Homogeneous media are exact and
    /// leave `rng` untouched; heterogeneous media return an unbiased estimate.
    pub fn transmittance(&self, ray: &Ray3f, rng: &mut LcgRng) -> RGBSpectrum {
        match &self.kind {
            MediumKind::Homogeneous(m) => m.transmittance(ray),
            MediumKind::Heterogeneous(m) => m.transmittance(ray, rng),
        }
    }

    pub fn sample_interaction(&self, ray: &Ray3f, rng: &mut LcgRng) -> MediumSample {
        match &self.kind {
            MediumKind::Homogeneous(m) => m.sample_interaction(ray, rng),
            MediumKind::Heterogeneous(m) => m.sample_interaction(ray, rng),
        }
    }

    /// `wi` is the direction the path was travelling before scattering.
    pub fn sample_phase(&self, wi: &Vector3f, u: &Vector2f) -> PhaseSample {
        self.phase.sample(wi, u)
    }

    pub fn eval_phase(&self, wi: &Vector3f, wo: &Vector3f) -> (Float, Float) {
        self.phase.eval(wi, wo)
    }
}

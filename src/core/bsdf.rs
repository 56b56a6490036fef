// Copyright @yucwang 2023

use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::spectrum::RGBSpectrum;

// Definitions of types used in BSDF sampling and eval
// processes. All directions are in the local shading frame
// (normal along +z) and point away from the surface.
pub type BSDFValue = RGBSpectrum;

/// Quantity carried by the path. Refraction scales radiance by
/// `(eta_i / eta_t)^2`; importance crosses the interface unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Radiance,
    Importance,
}

impl Default for TransportMode {
    fn default() -> Self {
        TransportMode::Radiance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BSDFSampleRecord {
    /// Direction toward the previous path vertex.
    pub wi: Vector3f,
    /// Sampled direction the path continues along.
    pub wo: Vector3f,
    pub pdf: Float,
    /// `f * |cos(wo)| / pdf`, the throughput multiplier of the sample.
    pub weight: BSDFValue,
    pub is_delta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BSDFEvalResult {
    pub value: BSDFValue,
    pub pdf: Float,
}

pub trait BSDF {
    /// Reflectance and sampling density for the pair `(wi, wo)` in the record.
    /// Delta lobes evaluate to zero.
    fn eval(&self, sample_record: &BSDFSampleRecord) -> BSDFEvalResult;
    /// Importance-samples `wo` given `wi`. A record with `pdf == 0` means
    /// no valid direction was produced.
    fn sample(&self, u1: Vector2f,
                     u2: Vector2f,
                     wi: Vector3f) -> BSDFSampleRecord;
}

impl Default for BSDFSampleRecord {
    fn default() -> Self {
        Self {
            wi: Vector3f::zeros(),
            wo: Vector3f::zeros(),
            pdf: 0.0,
            weight: RGBSpectrum::default(),
            is_delta: false,
        }
    }
}

impl BSDFSampleRecord {
    pub fn new(wi: Vector3f, wo: Vector3f) -> Self {
        Self {
            wi,
            wo,
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.pdf > 0.0 && self.pdf.is_finite() && self.weight.is_finite()
    }
}

impl Default for BSDFEvalResult {
    fn default() -> Self {
        Self {
            value: RGBSpectrum::default(),
            pdf: 0.0,
        }
    }
}

pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

pub fn abs_cos_theta(w: &Vector3f) -> Float {
    w.z.abs()
}

pub fn same_hemisphere(a: &Vector3f, b: &Vector3f) -> bool {
    a.z * b.z > 0.0
}

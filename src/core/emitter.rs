// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Connection from a shading point to a delta emitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterSample {
    /// Unit direction from the shading point toward the emitter.
    pub direction: Vector3f,
    /// Distance to the emitter, `FLOAT_MAX` for emitters at infinity.
    pub distance: Float,
    /// Incident radiance before visibility and transmittance.
    pub radiance: RGBSpectrum,
}

pub trait Emitter: Send + Sync {
    fn sample_li(&self, p: &Vector3f) -> Option<EmitterSample>;
    fn describe(&self) -> String {
        String::from("Emitter")
    }
}

// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFSampleRecord, BSDFEvalResult, TransportMode, BSDF};
use crate::materials::microfacet::{fresnel_dielectric, reflect, refract};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Smooth glass interface. Reflection is chosen with the Fresnel probability,
/// so both branches carry only the tint (and the radiance compression on refraction).
pub struct DielectricBSDF {
    int_ior: Float,
    ext_ior: Float,
    specular_reflectance: RGBSpectrum,
    specular_transmittance: RGBSpectrum,
    mode: TransportMode,
}

impl DielectricBSDF {
    pub fn new(int_ior: Float, ext_ior: Float, specular_reflectance: RGBSpectrum, specular_transmittance: RGBSpectrum) -> Self {
        Self {
            int_ior,
            ext_ior,
            specular_reflectance,
            specular_transmittance,
            mode: TransportMode::default(),
        }
    }

    pub fn with_transport_mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }
}

impl BSDF for DielectricBSDF {
    fn eval(&self, _sample_record: &BSDFSampleRecord) -> BSDFEvalResult {
        BSDFEvalResult::default()
    }

    fn sample(&self, _u1: Vector2f, u2: Vector2f, wi: Vector3f) -> BSDFSampleRecord {
        let mut sampling_record = BSDFSampleRecord::new(wi, Vector3f::zeros());
        if wi.z == 0.0 {
            return sampling_record;
        }

        let entering = wi.z > 0.0;
        let (eta_i, eta_t) = if entering {
            (self.ext_ior, self.int_ior)
        } else {
            (self.int_ior, self.ext_ior)
        };
        let n = Vector3f::new(0.0, 0.0, if entering { 1.0 } else { -1.0 });
        let f = fresnel_dielectric(wi.z, self.ext_ior, self.int_ior);

        if u2.x < f {
            sampling_record.wo = reflect(&wi, &n);
            sampling_record.pdf = f;
            sampling_record.weight = self.specular_reflectance;
        } else {
            let eta = eta_i / eta_t;
            let wo = match refract(&wi, &n, eta) {
                Some(wo) => wo.normalize(),
                None => return sampling_record,
            };
            sampling_record.wo = wo;
            sampling_record.pdf = 1.0 - f;
            let scale = match self.mode {
                TransportMode::Radiance => eta * eta,
                TransportMode::Importance => 1.0,
            };
            sampling_record.weight = self.specular_transmittance * scale;
        }
        sampling_record.is_delta = true;
        sampling_record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dielectric_branches() {
        let bsdf = DielectricBSDF::new(1.5, 1.0, RGBSpectrum::ones(), RGBSpectrum::ones());
        let wi = Vector3f::new(0.0, 0.0, 1.0);

        let reflected = bsdf.sample(Vector2f::new(0.5, 0.5), Vector2f::new(0.01, 0.5), wi);
        assert!(reflected.is_delta);
        assert!((reflected.wo - wi).norm() < 1e-6);

        let refracted = bsdf.sample(Vector2f::new(0.5, 0.5), Vector2f::new(0.9, 0.5), wi);
        assert!((refracted.wo - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-5);
        assert!((refracted.weight[0] - 1.0 / 2.25).abs() < 1e-5);
        assert!((reflected.pdf + refracted.pdf - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_dielectric_importance_is_not_compressed() {
        let bsdf = DielectricBSDF::new(1.5, 1.0, RGBSpectrum::ones(), RGBSpectrum::ones())
            .with_transport_mode(TransportMode::Importance);
        let wi = Vector3f::new(0.0, 0.0, 1.0);
        let refracted = bsdf.sample(Vector2f::new(0.5, 0.5), Vector2f::new(0.9, 0.5), wi);
        assert!(refracted.wo.z < 0.0);
        assert!((refracted.weight[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let bsdf = DielectricBSDF::new(1.5, 1.0, RGBSpectrum::ones(), RGBSpectrum::ones());
        let wi = Vector3f::new(0.9, 0.0, -0.2).normalize();
        let record = bsdf.sample(Vector2f::new(0.5, 0.5), Vector2f::new(0.999, 0.5), wi);
        assert!(record.is_valid());
        assert!(record.wo.z < 0.0);
    }
}

// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFSampleRecord, BSDFEvalResult, BSDF};
use crate::math::constants::{Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Perfect specular reflector tinted by its specular reflectance.
pub struct MirrorBSDF {
    specular_reflectance: RGBSpectrum,
}

impl MirrorBSDF {
    pub fn new(specular_reflectance: RGBSpectrum) -> Self {
        Self { specular_reflectance }
    }
}

impl BSDF for MirrorBSDF {
    fn eval(&self, _sample_record: &BSDFSampleRecord) -> BSDFEvalResult {
        BSDFEvalResult::default()
    }

    fn sample(&self, _u1: Vector2f, _u2: Vector2f, wi: Vector3f) -> BSDFSampleRecord {
        let mut sampling_record = BSDFSampleRecord::new(wi, Vector3f::new(-wi.x, -wi.y, wi.z));
        if wi.z == 0.0 {
            return sampling_record;
        }
        sampling_record.pdf = 1.0;
        sampling_record.weight = self.specular_reflectance;
        sampling_record.is_delta = true;
        sampling_record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_reflects_about_normal() {
        let bsdf = MirrorBSDF::new(RGBSpectrum::splat(0.9));
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let record = bsdf.sample(Vector2f::new(0.5, 0.5), Vector2f::new(0.5, 0.5), wi);
        assert!(record.is_delta);
        assert!((record.wo - Vector3f::new(-0.6, 0.0, 0.8)).norm() < 1e-6);
        assert_eq!(record.weight, RGBSpectrum::splat(0.9));
        assert!(bsdf.eval(&record).value.is_black());
    }
}

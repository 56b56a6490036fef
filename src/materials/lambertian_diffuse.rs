// Copyright @yucwang 2023

use crate::core::bsdf::{BSDFSampleRecord, BSDFEvalResult, BSDF, abs_cos_theta, same_hemisphere};
use crate::math::constants::{ INV_PI, Vector2f, Vector3f };
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{ sample_cosine_hemisphere, sample_cosine_hemisphere_pdf };

pub struct LambertianDiffuseBSDF {
    color: RGBSpectrum
}

impl BSDF for LambertianDiffuseBSDF {
    fn eval(&self, sample_record: &BSDFSampleRecord) -> BSDFEvalResult {
        let mut eval_result = BSDFEvalResult::default();
        if !same_hemisphere(&sample_record.wi, &sample_record.wo) {
            return eval_result;
        }
        eval_result.value = self.color * INV_PI;
        eval_result.pdf = sample_cosine_hemisphere_pdf(abs_cos_theta(&sample_record.wo));

        eval_result
    }

    fn sample(&self,
              u1: Vector2f,
              _u2: Vector2f,
              wi: Vector3f) -> BSDFSampleRecord {
        let mut sampling_record = BSDFSampleRecord::new(wi, sample_cosine_hemisphere(&u1));
        if wi.z < 0.0 {
            sampling_record.wo.z *= -1.0;
        }
        sampling_record.pdf = sample_cosine_hemisphere_pdf(abs_cos_theta(&sampling_record.wo));
        if sampling_record.pdf > 0.0 {
            // f * cos / pdf collapses to the albedo under cosine sampling.
            sampling_record.weight = self.color;
        }

        sampling_record
    }
}

impl LambertianDiffuseBSDF {
    pub fn new(rgb: RGBSpectrum) -> Self {
        Self {
            color: rgb,
        }
    }
}

// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFSampleRecord, BSDFEvalResult, BSDF};
use crate::materials::microfacet::{fresnel_conductor, reflect, GGX};
use crate::math::constants::{Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

pub struct RoughConductorBSDF {
    distribution: GGX,
    eta: RGBSpectrum,
    k: RGBSpectrum,
    specular_reflectance: RGBSpectrum,
}

impl RoughConductorBSDF {
    pub fn new(distribution: GGX, eta: RGBSpectrum, k: RGBSpectrum, specular_reflectance: RGBSpectrum) -> Self {
        Self { distribution, eta, k, specular_reflectance }
    }

    fn eval_upper(&self, wi: &Vector3f, wo: &Vector3f) -> BSDFEvalResult {
        let mut eval_result = BSDFEvalResult::default();
        let cos_i = wi.z;
        let cos_o = wo.z;
        if cos_i <= 1e-6 || cos_o <= 1e-6 {
            return eval_result;
        }

        let mut m = wi + wo;
        if m.norm_squared() <= 0.0 {
            return eval_result;
        }
        m = m.normalize();
        let cos_i_m = wi.dot(&m);
        let cos_o_m = wo.dot(&m);
        if m.z <= 0.0 || cos_i_m <= 0.0 || cos_o_m <= 0.0 {
            return eval_result;
        }

        let d = self.distribution.d(&m);
        let g = self.distribution.g(wi, wo, &m);
        let f = fresnel_conductor(cos_i_m, self.eta, self.k) * self.specular_reflectance;
        eval_result.value = f * (d * g / (4.0 * cos_i * cos_o));
        eval_result.pdf = self.distribution.pdf_vndf(wi, &m) / (4.0 * cos_o_m);
        eval_result
    }
}

impl BSDF for RoughConductorBSDF {
    fn eval(&self, sample_record: &BSDFSampleRecord) -> BSDFEvalResult {
        let (wi, wo) = (sample_record.wi, sample_record.wo);
        if wi.z * wo.z <= 0.0 {
            return BSDFEvalResult::default();
        }
        let flip = if wi.z > 0.0 { 1.0 } else { -1.0 };
        self.eval_upper(&(wi * flip), &(wo * flip))
    }

    fn sample(&self, u1: Vector2f, _u2: Vector2f, wi_in: Vector3f) -> BSDFSampleRecord {
        let mut sampling_record = BSDFSampleRecord::new(wi_in, Vector3f::zeros());
        if wi_in.z == 0.0 {
            return sampling_record;
        }
        let flip = if wi_in.z > 0.0 { 1.0 } else { -1.0 };
        let wi = wi_in * flip;

        let m = self.distribution.sample_vndf(&wi, &u1);
        if wi.dot(&m) <= 0.0 {
            return sampling_record;
        }
        let wo = reflect(&wi, &m);
        if wo.z <= 0.0 {
            return sampling_record;
        }

        let eval = self.eval_upper(&wi, &wo);
        if !eval.pdf.is_finite() || eval.pdf <= 0.0 {
            return sampling_record;
        }

        sampling_record.wo = wo * flip;
        sampling_record.pdf = eval.pdf;
        sampling_record.weight = eval.value * (wo.z / eval.pdf);
        sampling_record
    }
}

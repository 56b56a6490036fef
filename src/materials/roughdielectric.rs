// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFSampleRecord, BSDFEvalResult, TransportMode, BSDF};
use crate::materials::microfacet::{fresnel_dielectric, reflect, refract, GGX};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

pub struct RoughDielectricBSDF {
    distribution: GGX,
    int_ior: Float,
    ext_ior: Float,
    specular_reflectance: RGBSpectrum,
    specular_transmittance: RGBSpectrum,
    mode: TransportMode,
}

impl RoughDielectricBSDF {
    pub fn new(distribution: GGX, int_ior: Float, ext_ior: Float, specular_reflectance: RGBSpectrum, specular_transmittance: RGBSpectrum) -> Self {
        Self {
            distribution,
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

    fn iors(&self, entering: bool) -> (Float, Float) {
        if entering {
            (self.ext_ior, self.int_ior)
        } else {
            (self.int_ior, self.ext_ior)
        }
    }

    // Evaluation with `wi` already flipped into the upper hemisphere.
    fn eval_upper(&self, wi: &Vector3f, wo: &Vector3f, eta_i: Float, eta_t: Float) -> BSDFEvalResult {
        let mut eval_result = BSDFEvalResult::default();
        let cos_i = wi.z;
        let cos_o = wo.z;
        if cos_i <= 1e-6 || cos_o.abs() <= 1e-6 {
            return eval_result;
        }

        if cos_o > 0.0 {
            let mut m = wi + wo;
            if m.norm_squared() <= 0.0 {
                return eval_result;
            }
            m = m.normalize();
            let cos_i_m = wi.dot(&m);
            let cos_o_m = wo.dot(&m);
            if cos_i_m <= 0.0 || cos_o_m <= 0.0 {
                return eval_result;
            }

            let d = self.distribution.d(&m);
            let g = self.distribution.g(wi, wo, &m);
            let f = fresnel_dielectric(cos_i_m, eta_i, eta_t);
            eval_result.value = self.specular_reflectance * (f * d * g / (4.0 * cos_i * cos_o));
            eval_result.pdf = f * self.distribution.pdf_vndf(wi, &m) / (4.0 * cos_o_m);
            return eval_result;
        }

        let eta = eta_t / eta_i;
        let mut m = wi + wo * eta;
        if m.norm_squared() <= 0.0 {
            return eval_result;
        }
        m = m.normalize();
        if m.z <= 0.0 {
            m = -m;
        }

        let cos_i_m = wi.dot(&m);
        let cos_o_m = wo.dot(&m);
        if cos_i_m <= 0.0 || cos_o_m >= 0.0 {
            return eval_result;
        }

        let d = self.distribution.d(&m);
        let g = self.distribution.g(wi, wo, &m);
        let f = fresnel_dielectric(cos_i_m, eta_i, eta_t);
        let denom = cos_i_m + eta * cos_o_m;
        let denom2 = denom * denom;
        if denom2 <= 1e-12 {
            return eval_result;
        }

        let numer = (1.0 - f) * d * g * cos_i_m * cos_o_m.abs();
        let scale = match self.mode {
            TransportMode::Radiance => 1.0,
            TransportMode::Importance => eta * eta,
        };
        eval_result.value = self.specular_transmittance * (scale * numer / (cos_i * cos_o.abs() * denom2));
        eval_result.pdf = (1.0 - f) * self.distribution.pdf_vndf(wi, &m) * (eta * eta) * cos_o_m.abs() / denom2;
        eval_result
    }
}

impl BSDF for RoughDielectricBSDF {
    fn eval(&self, sample_record: &BSDFSampleRecord) -> BSDFEvalResult {
        let wi = sample_record.wi;
        if wi.z == 0.0 {
            return BSDFEvalResult::default();
        }
        let entering = wi.z > 0.0;
        let flip = if entering { 1.0 } else { -1.0 };
        let (eta_i, eta_t) = self.iors(entering);
        self.eval_upper(&(wi * flip), &(sample_record.wo * flip), eta_i, eta_t)
    }

    fn sample(&self, u1: Vector2f, u2: Vector2f, wi_in: Vector3f) -> BSDFSampleRecord {
        let mut sampling_record = BSDFSampleRecord::new(wi_in, Vector3f::zeros());
        if wi_in.z == 0.0 {
            return sampling_record;
        }

        let entering = wi_in.z > 0.0;
        let flip = if entering { 1.0 } else { -1.0 };
        let wi = wi_in * flip;
        let (eta_i, eta_t) = self.iors(entering);

        let m = self.distribution.sample_vndf(&wi, &u1);
        let cos_i_m = wi.dot(&m);
        if cos_i_m <= 0.0 {
            return sampling_record;
        }

        let f = fresnel_dielectric(cos_i_m, eta_i, eta_t);
        let wo = if u2.x < f {
            let wo = reflect(&wi, &m);
            if wo.z <= 0.0 {
                return sampling_record;
            }
            wo
        } else {
            let wo = match refract(&wi, &m, eta_i / eta_t) {
                Some(wo) => wo.normalize(),
                None => return sampling_record,
            };
            if wo.z >= 0.0 {
                return sampling_record;
            }
            wo
        };

        let eval = self.eval_upper(&wi, &wo, eta_i, eta_t);
        if !eval.pdf.is_finite() || eval.pdf <= 0.0 {
            return sampling_record;
        }

        sampling_record.wo = wo * flip;
        sampling_record.pdf = eval.pdf;
        sampling_record.weight = eval.value * (wo.z.abs() / eval.pdf);
        sampling_record
    }
}

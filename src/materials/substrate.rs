// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFSampleRecord, BSDFEvalResult, BSDF};
use crate::materials::microfacet::{fresnel_schlick, reflect, GGX};
use crate::math::constants::{Float, Vector2f, Vector3f, PI, INV_PI};
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::sample_cosine_hemisphere;

/// Ashikhmin-Shirley coated diffuse: a glossy GGX coat over a Lambertian-like
/// base, with energy the coat reflects removed from the base.
pub struct SubstrateBSDF {
    distribution: GGX,
    diffuse_reflectance: RGBSpectrum,
    specular_reflectance: RGBSpectrum,
}

fn pow5(v: Float) -> Float {
    let v2 = v * v;
    v2 * v2 * v
}

impl SubstrateBSDF {
    pub fn new(distribution: GGX, diffuse_reflectance: RGBSpectrum, specular_reflectance: RGBSpectrum) -> Self {
        Self { distribution, diffuse_reflectance, specular_reflectance }
    }

    fn eval_upper(&self, wi: &Vector3f, wo: &Vector3f) -> BSDFEvalResult {
        let mut eval_result = BSDFEvalResult::default();
        let cos_i = wi.z;
        let cos_o = wo.z;
        if cos_i <= 1e-6 || cos_o <= 1e-6 {
            return eval_result;
        }

        let diffuse = self.diffuse_reflectance
            * (RGBSpectrum::ones() - self.specular_reflectance)
            * ((28.0 / (23.0 * PI)) * (1.0 - pow5(1.0 - 0.5 * cos_i)) * (1.0 - pow5(1.0 - 0.5 * cos_o)));

        let m = (wi + wo).normalize();
        let cos_i_m = wi.dot(&m);
        let mut specular = RGBSpectrum::default();
        let mut pdf_specular = 0.0;
        if cos_i_m > 0.0 && m.z > 0.0 {
            let d = self.distribution.d(&m);
            specular = fresnel_schlick(self.specular_reflectance, cos_i_m)
                * (d / (4.0 * cos_i_m * cos_i.max(cos_o)));
            pdf_specular = self.distribution.pdf_vndf(wi, &m) / (4.0 * wo.dot(&m));
        }

        eval_result.value = diffuse + specular;
        eval_result.pdf = 0.5 * (cos_o * INV_PI + pdf_specular);
        eval_result
    }
}

impl BSDF for SubstrateBSDF {
    fn eval(&self, sample_record: &BSDFSampleRecord) -> BSDFEvalResult {
        let (wi, wo) = (sample_record.wi, sample_record.wo);
        if wi.z * wo.z <= 0.0 {
            return BSDFEvalResult::default();
        }
        let flip = if wi.z > 0.0 { 1.0 } else { -1.0 };
        self.eval_upper(&(wi * flip), &(wo * flip))
    }

    fn sample(&self, u1: Vector2f, u2: Vector2f, wi_in: Vector3f) -> BSDFSampleRecord {
        let mut sampling_record = BSDFSampleRecord::new(wi_in, Vector3f::zeros());
        if wi_in.z == 0.0 {
            return sampling_record;
        }
        let flip = if wi_in.z > 0.0 { 1.0 } else { -1.0 };
        let wi = wi_in * flip;

        let wo = if u2.x < 0.5 {
            sample_cosine_hemisphere(&u1)
        } else {
            let m = self.distribution.sample_vndf(&wi, &u1);
            reflect(&wi, &m)
        };
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substrate_both_lobes_sampled() {
        let bsdf = SubstrateBSDF::new(GGX::new(0.1, 0.1), RGBSpectrum::splat(0.6), RGBSpectrum::splat(0.04));
        let wi = Vector3f::new(0.1, 0.3, 0.95).normalize();
        let diffuse = bsdf.sample(Vector2f::new(0.4, 0.7), Vector2f::new(0.2, 0.0), wi);
        let glossy = bsdf.sample(Vector2f::new(0.4, 0.7), Vector2f::new(0.8, 0.0), wi);
        assert!(diffuse.is_valid());
        assert!(glossy.is_valid());
        for record in [diffuse, glossy].iter() {
            let eval = bsdf.eval(record);
            assert!((eval.pdf - record.pdf).abs() < 1e-4 * record.pdf.max(1.0));
            assert!(!eval.value.is_black());
        }
    }
}

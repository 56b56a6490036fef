// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f, PI, TWO_PI};
use crate::math::spectrum::RGBSpectrum;

const MIN_ALPHA: Float = 1e-4;

fn clamp01(v: Float) -> Float {
    v.max(0.0).min(1.0)
}

/// Anisotropic GGX (Trowbridge-Reitz) microfacet distribution with
/// separable Smith shadowing. Directions are in the local shading frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GGX {
    alpha_u: Float,
    alpha_v: Float,
}

impl GGX {
    pub fn new(alpha_u: Float, alpha_v: Float) -> Self {
        Self {
            alpha_u: alpha_u.max(MIN_ALPHA),
            alpha_v: alpha_v.max(MIN_ALPHA),
        }
    }

    pub fn d(&self, m: &Vector3f) -> Float {
        if m.z <= 0.0 {
            return 0.0;
        }
        let x = m.x / self.alpha_u;
        let y = m.y / self.alpha_v;
        let denom = x * x + y * y + m.z * m.z;
        1.0 / (PI * self.alpha_u * self.alpha_v * denom * denom)
    }

    pub fn g1(&self, w: &Vector3f, m: &Vector3f) -> Float {
        if w.dot(m) * w.z <= 0.0 {
            return 0.0;
        }
        let cos2 = w.z * w.z;
        if cos2 <= 0.0 {
            return 0.0;
        }
        let ax = w.x * self.alpha_u;
        let ay = w.y * self.alpha_v;
        let alpha2_tan2 = (ax * ax + ay * ay) / cos2;
        2.0 / (1.0 + (1.0 + alpha2_tan2).sqrt())
    }

    pub fn g(&self, wi: &Vector3f, wo: &Vector3f, m: &Vector3f) -> Float {
        self.g1(wi, m) * self.g1(wo, m)
    }

    /// Density of sampling `m` from the visible normals seen from `wi` (`wi.z > 0`).
    pub fn pdf_vndf(&self, wi: &Vector3f, m: &Vector3f) -> Float {
        if wi.z <= 1e-6 || m.z <= 0.0 {
            return 0.0;
        }
        let dot = wi.dot(m);
        if dot <= 0.0 {
            return 0.0;
        }
        self.g1(wi, m) * dot * self.d(m) / wi.z
    }

    /// Visible-normal sampling. `wi` must lie in the upper hemisphere.
    pub fn sample_vndf(&self, wi: &Vector3f, u: &Vector2f) -> Vector3f {
        let wh = Vector3f::new(self.alpha_u * wi.x, self.alpha_v * wi.y, wi.z).normalize();

        let lensq = wh.x * wh.x + wh.y * wh.y;
        let t1 = if lensq > 1e-12 {
            Vector3f::new(-wh.y, wh.x, 0.0) / lensq.sqrt()
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let t2 = wh.cross(&t1);

        let r = clamp01(u.x).sqrt();
        let phi = TWO_PI * clamp01(u.y);
        let t1p = r * phi.cos();
        let mut t2p = r * phi.sin();
        let s = 0.5 * (1.0 + wh.z);
        t2p = (1.0 - s) * (1.0 - t1p * t1p).max(0.0).sqrt() + s * t2p;

        let nh = t1 * t1p + t2 * t2p + wh * (1.0 - t1p * t1p - t2p * t2p).max(0.0).sqrt();
        Vector3f::new(self.alpha_u * nh.x, self.alpha_v * nh.y, nh.z.max(1e-6)).normalize()
    }
}

pub fn reflect(wi: &Vector3f, m: &Vector3f) -> Vector3f {
    2.0 * wi.dot(m) * m - wi
}

/// Refracts `wi` through the microfacet `m`; `eta` is `eta_i / eta_t`.
pub fn refract(wi: &Vector3f, m: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_i = wi.dot(m).max(-1.0).min(1.0);
    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let sin2_t = eta * eta * sin2_i;
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    let wt = -eta * wi + (eta * cos_i - cos_t) * m;
    Some(wt)
}

pub fn fresnel_dielectric(cos_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_i = cos_i.max(-1.0).min(1.0);
    let entering = cos_i > 0.0;
    let (eta_i, eta_t) = if entering { (eta_i, eta_t) } else { (eta_t, eta_i) };
    cos_i = cos_i.abs();

    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let eta = eta_i / eta_t;
    let sin2_t = eta * eta * sin2_i;
    if sin2_t >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    let r_parl = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let r_perp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    0.5 * (r_parl * r_parl + r_perp * r_perp)
}

fn fresnel_conductor_channel(cos_i: Float, eta: Float, k: Float) -> Float {
    let cos_i = clamp01(cos_i);
    let cos2 = cos_i * cos_i;
    let sin2 = 1.0 - cos2;
    let eta2 = eta * eta;
    let k2 = k * k;

    let t0 = eta2 - k2 - sin2;
    let a2_plus_b2 = (t0 * t0 + 4.0 * eta2 * k2).max(0.0).sqrt();
    let t1 = a2_plus_b2 + cos2;
    let a = (0.5 * (a2_plus_b2 + t0)).max(0.0).sqrt();
    let t2 = 2.0 * cos_i * a;
    let rs = (t1 - t2) / (t1 + t2);

    let t3 = cos2 * a2_plus_b2 + sin2 * sin2;
    let t4 = t2 * sin2;
    let rp = rs * (t3 - t4) / (t3 + t4);

    0.5 * (rp + rs)
}

/// Unpolarized reflectance of a conductor with complex index `eta + i k`
/// relative to the outside medium.
pub fn fresnel_conductor(cos_i: Float, eta: RGBSpectrum, k: RGBSpectrum) -> RGBSpectrum {
    RGBSpectrum::new(
        fresnel_conductor_channel(cos_i, eta[0], k[0]),
        fresnel_conductor_channel(cos_i, eta[1], k[1]),
        fresnel_conductor_channel(cos_i, eta[2], k[2]),
    )
}

pub fn fresnel_schlick(f0: RGBSpectrum, cos_theta: Float) -> RGBSpectrum {
    let cos_theta = clamp01(cos_theta);
    let one_minus = (1.0 - cos_theta).powi(5);
    f0 + (RGBSpectrum::ones() - f0) * one_minus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ggx_vndf_sample_has_positive_pdf() {
        let ggx = GGX::new(0.3, 0.1);
        let wi = Vector3f::new(0.3, -0.2, 0.9).normalize();
        for i in 0..16 {
            let u = Vector2f::new((i as Float + 0.5) / 16.0, ((i * 7) % 16) as Float / 16.0);
            let m = ggx.sample_vndf(&wi, &u);
            assert!((m.norm() - 1.0).abs() < 1e-4);
            assert!(m.z > 0.0);
            assert!(ggx.pdf_vndf(&wi, &m) > 0.0);
        }
    }

    #[test]
    fn test_fresnel_limits() {
        assert!((fresnel_dielectric(1.0, 1.0, 1.5) - 0.04).abs() < 1e-3);
        assert_eq!(fresnel_dielectric(-0.05, 1.0, 1.5), 1.0);

        let f = fresnel_conductor(1.0, RGBSpectrum::splat(1.5), RGBSpectrum::splat(0.0));
        assert!((f[0] - 0.04).abs() < 1e-3);
        let grazing = fresnel_conductor(0.0, RGBSpectrum::splat(0.2), RGBSpectrum::splat(3.0));
        assert!((grazing[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_refract_straight_through() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let wt = refract(&n, &n, 1.0 / 1.5).expect("refract");
        assert!((wt - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }
}

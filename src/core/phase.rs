// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f, INV_FOUR_PI, TWO_PI};
use crate::math::frame::Frame;
use crate::math::warp::{sample_uniform_sphere, sample_uniform_sphere_pdf};

// Below this |g| the inverse CDF is replaced by its isotropic limit.
const HG_ISOTROPIC_THRESHOLD: Float = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSample {
    pub wo: Vector3f,
    pub value: Float,
    pub pdf: Float,
}

/// Henyey-Greenstein phase function; `g == 0` is the isotropic special case.
/// Angles are measured from the propagation direction, so `g > 0` favours
/// forward scattering. Sampling is exact, hence `pdf == value` everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HenyeyGreenstein {
    g: Float,
}

impl HenyeyGreenstein {
    pub fn new(g: Float) -> Self {
        Self { g }
    }

    pub fn g(&self) -> Float {
        self.g
    }

    fn kernel(&self, cos_theta: Float) -> Float {
        let g = self.g;
        let denom = 1.0 + g * g - 2.0 * g * cos_theta;
        INV_FOUR_PI * (1.0 - g * g) / (denom * denom.max(0.0).sqrt())
    }

    /// Returns `(value, pdf)` for scattering from travel direction `wi` into `wo`.
    pub fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> (Float, Float) {
        if self.g == 0.0 {
            return (INV_FOUR_PI, INV_FOUR_PI);
        }
        let value = self.kernel(wi.dot(wo));
        (value, value)
    }

    pub fn sample(&self, wi: &Vector3f, u: &Vector2f) -> PhaseSample {
        if self.g == 0.0 {
            return PhaseSample {
                wo: sample_uniform_sphere(u),
                value: INV_FOUR_PI,
                pdf: sample_uniform_sphere_pdf(),
            };
        }

        let g = self.g;
        let cos_theta = if g.abs() < HG_ISOTROPIC_THRESHOLD {
            1.0 - 2.0 * u.x
        } else {
            let sqr_term = (1.0 - g * g) / (1.0 - g + 2.0 * g * u.x);
            (1.0 + g * g - sqr_term * sqr_term) / (2.0 * g)
        };
        let cos_theta = cos_theta.max(-1.0).min(1.0);

        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = TWO_PI * u.y;
        let local = Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
        let wo = Frame::from_z(*wi).from_local(local);

        let value = self.kernel(cos_theta);
        PhaseSample { wo, value, pdf: value }
    }
}

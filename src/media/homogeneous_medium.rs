// Copyright @yucwang 2026

use crate::core::error::Result;
use crate::core::medium::{validate_coefficients, MediumSample};
use crate::core::rng::LcgRng;
use crate::math::constants::{Float, FLOAT_MAX};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Constant-coefficient medium with closed-form transmittance. The ray's
/// segment is `[0, ray.max_t]` measured from its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct HomogeneousMedium {
    sigma_a: RGBSpectrum,
    sigma_s: RGBSpectrum,
    sigma_t: RGBSpectrum,
}

impl HomogeneousMedium {
    pub fn new(sigma_a: RGBSpectrum, sigma_s: RGBSpectrum) -> Result<Self> {
        Self::from_coefficients(sigma_a, sigma_s, sigma_a + sigma_s)
    }

    /// Takes all three coefficients; `sigma_t` must match `sigma_a + sigma_s`.
    pub fn from_coefficients(sigma_a: RGBSpectrum, sigma_s: RGBSpectrum, sigma_t: RGBSpectrum) -> Result<Self> {
        validate_coefficients(&sigma_a, &sigma_s, &sigma_t)?;
        Ok(Self { sigma_a, sigma_s, sigma_t })
    }

    pub fn sigma_a(&self) -> RGBSpectrum {
        self.sigma_a
    }

    pub fn sigma_s(&self) -> RGBSpectrum {
        self.sigma_s
    }

    pub fn sigma_t(&self) -> RGBSpectrum {
        self.sigma_t
    }

    fn transmittance_at(&self, distance: Float) -> RGBSpectrum {
        (self.sigma_t * -distance).exp()
    }

    pub fn transmittance(&self, ray: &Ray3f) -> RGBSpectrum {
        self.transmittance_at(ray.max_t.min(FLOAT_MAX))
    }

    pub fn sample_interaction(&self, ray: &Ray3f, rng: &mut LcgRng) -> MediumSample {
        let channel = ((rng.next_f32() * 3.0) as usize).min(2);
        let u = rng.next_f32();
        let t_max = ray.max_t.min(FLOAT_MAX);

        let sigma = self.sigma_t[channel];
        let free_flight = if sigma > 0.0 { -(1.0 - u).ln() / sigma } else { FLOAT_MAX };
        let distance = free_flight.min(t_max);
        let interacted = distance < t_max;

        let tr = self.transmittance_at(distance);
        let density = if interacted { self.sigma_t * tr } else { tr };
        let mut pdf = density.average();
        if pdf == 0.0 {
            pdf = 1.0;
        }

        let weight = if interacted { tr * self.sigma_s / pdf } else { tr / pdf };
        MediumSample { t: distance, interacted, weight }
    }
}

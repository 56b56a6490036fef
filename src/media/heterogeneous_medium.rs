// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::core::medium::{validate_coefficients, MediumSample};
use crate::core::rng::LcgRng;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f, FLOAT_MAX};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use super::density_grid::DensityGrid;

// Ratio tracking starts Russian roulette below this running transmittance.
const RR_TRANSMITTANCE: Float = 0.1;

/// Grid-driven medium. Transmittance is estimated by ratio tracking and
/// interactions are sampled by delta tracking against the majorant
/// `max_density * luminance(sigma_t)`. Both loops stop after
/// `max_iterations` steps, which biases pathological grids toward
/// transparency.
#[derive(Debug, Clone, PartialEq)]
pub struct HeterogeneousMedium {
    sigma_a: RGBSpectrum,
    sigma_s: RGBSpectrum,
    sigma_t: RGBSpectrum,
    grid: DensityGrid,
    inv_max_density: Float,
    bounds: AABB,
    inv_extent: Vector3f,
    max_iterations: u32,
}

impl HeterogeneousMedium {
    pub fn new(sigma_a: RGBSpectrum,
               sigma_s: RGBSpectrum,
               grid: DensityGrid,
               bounds: AABB,
               max_iterations: u32) -> Result<Self> {
        Self::from_coefficients(sigma_a, sigma_s, sigma_a + sigma_s, grid, bounds, max_iterations)
    }

    pub fn from_coefficients(sigma_a: RGBSpectrum,
                             sigma_s: RGBSpectrum,
                             sigma_t: RGBSpectrum,
                             grid: DensityGrid,
                             bounds: AABB,
                             max_iterations: u32) -> Result<Self> {
        validate_coefficients(&sigma_a, &sigma_s, &sigma_t)?;
        if max_iterations == 0 {
            return Err(RenderError::InvalidMedium(String::from("max_iterations must be at least 1")));
        }
        // Rejects empty and flat boxes.
        bounds.offset(&bounds.center())?;
        let inv_extent = Vector3f::new(1.0, 1.0, 1.0).component_div(&bounds.diagonal());

        let max_density = grid.max_density();
        let inv_max_density = if max_density > 0.0 { 1.0 / max_density } else { 0.0 };
        if max_density == 0.0 {
            log::warn!("Heterogeneous medium has an all-zero density grid; it is transparent.");
        }

        Ok(Self { sigma_a, sigma_s, sigma_t, grid, inv_max_density, bounds, inv_extent, max_iterations })
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

    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    pub fn grid(&self) -> &DensityGrid {
        &self.grid
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn density_at(&self, p: &Vector3f) -> Float {
        let local = (p - self.bounds.p_min).component_mul(&self.inv_extent);
        self.grid.lookup(&local)
    }

    // Scalar majorant extinction, zero when nothing in the grid can interact.
    fn majorant(&self) -> Float {
        if self.inv_max_density == 0.0 {
            return 0.0;
        }
        self.sigma_t.luminance()
    }

    fn step(&self, rng: &mut LcgRng, sigma: Float) -> Float {
        -(1.0 - rng.next_f32()).ln() * self.inv_max_density / sigma
    }

    /// Ratio-tracking estimate of transmittance along `[0, ray.max_t]`.
    pub fn transmittance(&self, ray: &Ray3f, rng: &mut LcgRng) -> RGBSpectrum {
        let sigma = self.majorant();
        if !(sigma > 0.0) {
            return RGBSpectrum::ones();
        }

        let t_max = ray.max_t.min(FLOAT_MAX);
        let mut tr: Float = 1.0;
        let mut distance: Float = 0.0;
        for _ in 0..self.max_iterations {
            distance += self.step(rng, sigma);
            if distance >= t_max {
                break;
            }
            tr *= 1.0 - self.density_at(&ray.at(distance)) * self.inv_max_density;

            if tr < RR_TRANSMITTANCE {
                let q = 1.0 - tr;
                if rng.next_f32() < q {
                    return RGBSpectrum::splat(0.0);
                }
                tr /= 1.0 - q;
            }
        }

        RGBSpectrum::splat(tr.max(0.0))
    }

    /// Delta tracking. An interaction carries the single-scattering albedo.
    pub fn sample_interaction(&self, ray: &Ray3f, rng: &mut LcgRng) -> MediumSample {
        let t_max = ray.max_t.min(FLOAT_MAX);
        let escaped = MediumSample { t: t_max, interacted: false, weight: RGBSpectrum::ones() };

        let sigma = self.majorant();
        if !(sigma > 0.0) {
            return escaped;
        }

        let mut distance: Float = 0.0;
        for _ in 0..self.max_iterations {
            distance += self.step(rng, sigma);
            if distance >= t_max {
                return escaped;
            }
            let density = self.density_at(&ray.at(distance));
            if rng.next_f32() < density * self.inv_max_density {
                return MediumSample { t: distance, interacted: true, weight: self.albedo() };
            }
        }

        MediumSample { t: distance, interacted: false, weight: RGBSpectrum::ones() }
    }

    fn albedo(&self) -> RGBSpectrum {
        let mut albedo = RGBSpectrum::splat(0.0);
        for c in 0..3 {
            if self.sigma_t[c] > 0.0 {
                albedo[c] = self.sigma_s[c] / self.sigma_t[c];
            }
        }
        albedo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> AABB {
        AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 1.0, 1.0))
    }

    fn uniform_medium(density: Float, sigma_s: Float, max_iterations: u32) -> HeterogeneousMedium {
        let grid = DensityGrid::new(4, 4, 4, vec![density; 64]).expect("grid");
        HeterogeneousMedium::new(RGBSpectrum::splat(0.0), RGBSpectrum::splat(sigma_s), grid, unit_box(), max_iterations)
            .expect("medium")
    }

    fn axis_ray(t_max: Float) -> Ray3f {
        Ray3f::new(Vector3f::new(0.5, 0.5, 0.0), Vector3f::new(0.0, 0.0, 1.0), Some(0.0), Some(t_max))
    }

    #[test]
    fn test_zero_density_is_transparent() {
        let medium = uniform_medium(0.0, 4.0, 1000);
        let mut rng = LcgRng::new(11);
        for _ in 0..128 {
            assert_eq!(medium.transmittance(&axis_ray(1.0), &mut rng), RGBSpectrum::ones());
            let s = medium.sample_interaction(&axis_ray(1.0), &mut rng);
            assert!(!s.interacted);
            assert_eq!(s.weight, RGBSpectrum::ones());
        }
    }

    #[test]
    fn test_ratio_tracking_matches_beer_lambert() {
        // Interior of the box has density 1; sigma_t = 1 along a 0.5 segment
        // that stays in the fully-weighted centre cells.
        let medium = uniform_medium(1.0, 1.0, 10_000);
        let ray = Ray3f::new(Vector3f::new(0.5, 0.5, 0.25), Vector3f::new(0.0, 0.0, 1.0), Some(0.0), Some(0.5));
        let mut rng = LcgRng::new(5);
        let n = 20000;
        let mut sum = 0.0;
        for _ in 0..n {
            let tr = medium.transmittance(&ray, &mut rng);
            assert!(tr[0] >= 0.0 && tr.is_finite());
            sum += tr[0];
        }
        let expected = (-0.5 as Float).exp();
        assert!((sum / n as Float - expected).abs() < 0.02, "{}", sum / n as Float);
    }

    #[test]
    fn test_partial_density_tracking_matches_beer_lambert() {
        // Density 0.5 everywhere except one corner cell at 1.0, so the
        // majorant is twice the density seen along the ray and ratio
        // tracking has to survive several roulette rounds.
        let mut data = vec![0.5; 64];
        data[0] = 1.0;
        let grid = DensityGrid::new(4, 4, 4, data).expect("grid");
        let medium = HeterogeneousMedium::new(RGBSpectrum::splat(0.0), RGBSpectrum::splat(4.0), grid, unit_box(), 10_000)
            .expect("medium");
        let ray = Ray3f::new(Vector3f::new(0.75, 0.75, 0.25), Vector3f::new(0.0, 0.0, 1.0), Some(0.0), Some(0.5));
        assert!((medium.density_at(&ray.at(0.25)) - 0.5).abs() < 1e-5);

        let expected = (-1.0 as Float).exp();
        let n = 40000;
        let mut rng = LcgRng::new(17);
        let mut ratio_sum = 0.0;
        let mut escaped = 0;
        for _ in 0..n {
            ratio_sum += medium.transmittance(&ray, &mut rng)[0];
            if !medium.sample_interaction(&ray, &mut rng).interacted {
                escaped += 1;
            }
        }
        let ratio_mean = ratio_sum / n as Float;
        let escape_rate = escaped as Float / n as Float;
        assert!((ratio_mean - expected).abs() < 0.02, "ratio tracking {}", ratio_mean);
        assert!((escape_rate - expected).abs() < 0.02, "delta tracking {}", escape_rate);
    }

    #[test]
    fn test_far_origin_ray_sees_no_density() {
        let medium = uniform_medium(1.0, 4.0, 1000);
        assert_eq!(medium.density_at(&Vector3f::new(1.0e20, 0.5, 0.5)), 0.0);

        let ray = Ray3f::new(Vector3f::new(1.0e20, 0.5, 0.5), Vector3f::new(-1.0, 0.0, 0.0), Some(0.0), Some(1.0));
        let mut rng = LcgRng::new(3);
        for _ in 0..64 {
            assert_eq!(medium.transmittance(&ray, &mut rng), RGBSpectrum::ones());
            assert!(!medium.sample_interaction(&ray, &mut rng).interacted);
        }
    }

    #[test]
    fn test_delta_tracking_weight_is_albedo() {
        let grid = DensityGrid::new(2, 2, 2, vec![2.0; 8]).expect("grid");
        let medium = HeterogeneousMedium::new(RGBSpectrum::new(1.0, 0.0, 3.0), RGBSpectrum::new(1.0, 2.0, 1.0),
                                              grid, unit_box(), 1000).expect("medium");
        let mut rng = LcgRng::new(23);
        let mut interactions = 0;
        for _ in 0..256 {
            let s = medium.sample_interaction(&axis_ray(1.0), &mut rng);
            if s.interacted {
                interactions += 1;
                assert!(s.t > 0.0 && s.t < 1.0);
                assert!((s.weight[0] - 0.5).abs() < 1e-5);
                assert!((s.weight[1] - 1.0).abs() < 1e-5);
                assert!((s.weight[2] - 0.25).abs() < 1e-5);
            }
        }
        assert!(interactions > 0);
    }

    #[test]
    fn test_iteration_cap_terminates() {
        let medium = uniform_medium(1.0, 1000.0, 3);
        let mut rng = LcgRng::new(1);
        let s = medium.sample_interaction(&axis_ray(FLOAT_MAX), &mut rng);
        assert!(s.t.is_finite());
        let tr = medium.transmittance(&axis_ray(FLOAT_MAX), &mut rng);
        assert!(tr.is_finite());
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let grid = DensityGrid::new(1, 1, 1, vec![1.0]).expect("grid");
        let flat = AABB::new(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 1.0));
        assert!(HeterogeneousMedium::new(RGBSpectrum::ones(), RGBSpectrum::ones(), grid.clone(), flat, 10).is_err());
        assert!(HeterogeneousMedium::new(RGBSpectrum::ones(), RGBSpectrum::ones(), grid, unit_box(), 0).is_err());
    }
}

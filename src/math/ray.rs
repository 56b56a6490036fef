// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f, FLOAT_MAX};
use crate::core::error::{RenderError, Result};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
    inv_dir: Vector3f,
    pub min_t: Float,
    pub max_t: Float
}

impl Ray3f {
    /// Builds a ray with a normalized direction. A zero-length direction
    /// yields NaN components; use `try_new` when the direction is untrusted.
    pub fn new(o: Vector3f, d: Vector3f,
               min_t: Option<Float>, max_t: Option<Float>) -> Self {
        let dir = d.normalize();
        Self { origin: o, dir,
               inv_dir: Vector3f::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z),
               min_t: min_t.unwrap_or(0.0),
               max_t: max_t.unwrap_or(FLOAT_MAX)}
    }

    pub fn try_new(o: Vector3f, d: Vector3f,
                   min_t: Option<Float>, max_t: Option<Float>) -> Result<Self> {
        let len2 = d.norm_squared();
        if !(len2 > 0.0) || !len2.is_finite() {
            return Err(RenderError::DegenerateGeometry(
                format!("ray direction ({}, {}, {}) has no length", d.x, d.y, d.z)));
        }
        Ok(Self::new(o, d, min_t, max_t))
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn inv_dir(&self) -> Vector3f {
        self.inv_dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    /// Same origin and direction, parametric range cut to `[min_t, max_t]`.
    pub fn with_max_t(&self, max_t: Float) -> Self {
        let mut r = *self;
        r.max_t = max_t;
        r
    }

    pub fn update(&mut self, t: Float) -> bool {
        if t < self.min_t || t > self.max_t {
            false
        } else {
            self.max_t = t;
            true
        }
    }

    pub fn test_segment(&self, t: Float) -> bool {
        t >= self.min_t && t <= self.max_t
    }
}

/* Tests for Ray */

#[cfg(test)]
mod tests {
    use super::Vector3f;
    use super::{Ray3f};

    #[test]
    fn test_ray3f() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        let d = Vector3f::new(1.0, 0.0, 1.0);
        let mut ray = Ray3f::new(o, d, None, None);
        assert_eq!(o, ray.origin());

        let v1 = ray.at(2.0);
        assert!((v1[0] - std::f32::consts::SQRT_2).abs() < 1e-5);
        assert!((v1[1] - 0.0).abs() < 1e-5);
        assert!((v1[2] - std::f32::consts::SQRT_2).abs() < 1e-5);

        let status1 = ray.update(100.0);
        let status2 = ray.update(105.0);
        assert_eq!(status1, true);
        assert_eq!(status2, false);
    }

    #[test]
    fn test_ray3f_rejects_zero_direction() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        assert!(Ray3f::try_new(o, Vector3f::zeros(), None, None).is_err());
        assert!(Ray3f::try_new(o, Vector3f::new(0.0, 2.0, 0.0), None, None).is_ok());
    }
}

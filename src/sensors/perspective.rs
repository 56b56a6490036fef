// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Pinhole camera looking from `origin` at `target`.
pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               aspect: Float) -> Result<Self> {
        let view = target - origin;
        let right = view.cross(&up);
        if !(view.norm() > 0.0) || !(right.norm() > 0.0) {
            return Err(RenderError::DegenerateGeometry(
                String::from("camera view direction is zero or parallel to up")));
        }
        if !(fov_y_radians > 0.0) || !(aspect > 0.0) {
            return Err(RenderError::DegenerateGeometry(
                format!("camera fov {} and aspect {} must be positive", fov_y_radians, aspect)));
        }

        let forward = view.normalize();
        let right = right.normalize();
        let up = right.cross(&forward).normalize();
        Ok(Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect,
        })
    }
}

impl Sensor for PerspectiveCamera {
    fn sample_ray(&self, u: &Vector2f) -> Ray3f {
        let px = (2.0 * u.x - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * u.y) * self.tan_half_fov_y;
        let dir = self.right * px + self.up * py + self.forward;
        Ray3f::new(self.origin, dir, Some(0.0), None)
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera(origin = {:?})", self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_center_ray_looks_at_target() {
        let camera = PerspectiveCamera::new(Vector3f::new(0.0, 0.0, -3.0), Vector3f::zeros(),
                                            Vector3f::new(0.0, 1.0, 0.0), 0.5, 1.0).expect("camera");
        let ray = camera.sample_ray(&Vector2f::new(0.5, 0.5));
        assert!((ray.dir() - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        // Top of the film maps to +up.
        assert!(camera.sample_ray(&Vector2f::new(0.5, 0.0)).dir().y > 0.0);
        assert!(PerspectiveCamera::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0),
                                       Vector3f::new(0.0, 1.0, 0.0), 0.5, 1.0).is_err());
    }
}

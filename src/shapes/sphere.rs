// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f, Vector3f, INV_PI, PI};
use crate::math::ray::Ray3f;

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vector3f,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float) -> Result<Self> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(RenderError::DegenerateGeometry(format!("sphere radius {} must be positive", radius)));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Vector3f {
        self.center
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    fn uv_of(n: &Vector3f) -> Vector2f {
        let mut phi = n.y.atan2(n.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }
        let theta = n.z.max(-1.0).min(1.0).acos();
        Vector2f::new(phi * 0.5 * INV_PI, theta * INV_PI)
    }
}

impl Shape for Sphere {
    fn bounding_box(&self) -> AABB {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        AABB::new(self.center - r, self.center + r)
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let oc = ray.origin() - self.center;
        let d = ray.dir();
        let half_b = oc.dot(&d);
        let c = oc.norm_squared() - self.radius * self.radius;
        let discriminant = half_b * half_b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let near = -half_b - sqrt_d;
        let far = -half_b + sqrt_d;
        let t = if ray.test_segment(near) {
            near
        } else if ray.test_segment(far) {
            far
        } else {
            return None;
        };

        let p = ray.at(t);
        let n = (p - self.center) / self.radius;
        Some(SurfaceIntersection::new(p, n, Self::uv_of(&n), t))
    }

    fn surface_area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }

    fn describe(&self) -> String {
        format!("Sphere(center = {:?}, radius = {})", self.center, self.radius)
    }
}

// Copyright @yucwang 2026

use crate::core::error::Result;
use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f, Vector3f, EPSILON};
use crate::math::ray::Ray3f;

/// Axis-aligned box, mostly used as the container of a volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    bbox: AABB,
}

impl Cuboid {
    pub fn new(p_min: Vector3f, p_max: Vector3f) -> Result<Self> {
        let bbox = AABB::new(p_min, p_max);
        // Flat boxes have no interior.
        bbox.offset(&bbox.center())?;
        Ok(Self { bbox })
    }

    fn face_uv(&self, p: &Vector3f, axis: usize) -> Vector2f {
        let local = (p - self.bbox.p_min).component_div(&self.bbox.diagonal());
        let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
        Vector2f::new(local[a], local[b])
    }
}

impl Shape for Cuboid {
    fn bounding_box(&self) -> AABB {
        self.bbox
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let o = ray.origin();
        let d = ray.dir();

        let mut t_near = -Float::INFINITY;
        let mut t_far = Float::INFINITY;
        let mut near_axis = 0;
        let mut far_axis = 0;

        for axis in 0..3 {
            if d[axis].abs() < EPSILON {
                if o[axis] < self.bbox.p_min[axis] || o[axis] > self.bbox.p_max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d[axis];
            let mut t0 = (self.bbox.p_min[axis] - o[axis]) * inv;
            let mut t1 = (self.bbox.p_max[axis] - o[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_near {
                t_near = t0;
                near_axis = axis;
            }
            if t1 < t_far {
                t_far = t1;
                far_axis = axis;
            }
        }
        if t_near > t_far {
            return None;
        }

        let (t, axis) = if ray.test_segment(t_near) {
            (t_near, near_axis)
        } else if ray.test_segment(t_far) {
            (t_far, far_axis)
        } else {
            return None;
        };

        let p = ray.at(t);
        let mut n = Vector3f::zeros();
        let to_max = (p[axis] - self.bbox.p_max[axis]).abs();
        let to_min = (p[axis] - self.bbox.p_min[axis]).abs();
        n[axis] = if to_max < to_min { 1.0 } else { -1.0 };
        Some(SurfaceIntersection::new(p, n, self.face_uv(&p, axis), t))
    }

    fn surface_area(&self) -> Float {
        self.bbox.surface_area()
    }

    fn describe(&self) -> String {
        format!("Cuboid(min = {:?}, max = {:?})", self.bbox.p_min, self.bbox.p_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_entry_and_exit() {
        let cuboid = Cuboid::new(Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(1.0, 1.0, 1.0)).expect("cuboid");
        let ray = Ray3f::new(Vector3f::new(0.2, 0.1, -5.0), Vector3f::new(0.0, 0.0, 1.0), Some(0.0), None);
        let hit = cuboid.ray_intersection(&ray).expect("entry");
        assert!((hit.t() - 4.0).abs() < 1e-5);
        assert_eq!(hit.geo_normal(), Vector3f::new(0.0, 0.0, -1.0));

        let inside = Ray3f::new(Vector3f::new(0.2, 0.1, 0.0), Vector3f::new(0.0, 1.0, 0.0), Some(0.0), None);
        let hit = cuboid.ray_intersection(&inside).expect("exit");
        assert!((hit.t() - 0.9).abs() < 1e-5);
        assert_eq!(hit.geo_normal(), Vector3f::new(0.0, 1.0, 0.0));

        let miss = Ray3f::new(Vector3f::new(3.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), Some(0.0), None);
        assert!(cuboid.ray_intersection(&miss).is_none());
    }

    #[test]
    fn test_cuboid_rejects_flat_box() {
        assert!(Cuboid::new(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 1.0)).is_err());
        let c = Cuboid::new(Vector3f::zeros(), Vector3f::new(1.0, 2.0, 3.0)).expect("cuboid");
        assert!((c.surface_area() - 22.0).abs() < 1e-5);
    }
}

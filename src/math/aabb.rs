// Copyright 2020 @TwoCookingMice

use super::constants::{ gamma, Float, Int, Vector3f,
                        FLOAT_INFINITY };
use super::ray::{ Ray3f };
use crate::core::error::{ RenderError, Result };

// Slab hits at or below this distance are treated as behind the ray origin.
const MIN_FAR_T: Float = 1e-5;

/// Axis-aligned bounding box. The empty box has `p_min = +inf` and
/// `p_max = -inf` and rejects every ray until it is expanded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub p_min: Vector3f,
    pub p_max: Vector3f
}

impl Default for AABB {
    fn default() -> Self {
        Self { p_min: Vector3f::new(FLOAT_INFINITY, FLOAT_INFINITY, FLOAT_INFINITY),
               p_max: Vector3f::new(-FLOAT_INFINITY, -FLOAT_INFINITY, -FLOAT_INFINITY) }
    }
}

impl AABB {
    /// Box spanning two corners given in any order.
    pub fn new(p_min: Vector3f, p_max: Vector3f) -> Self {
        let mut min = Vector3f::new(0.0, 0.0, 0.0);
        let mut max = Vector3f::new(0.0, 0.0, 0.0);
        for idx in 0..3 {
            min[idx] = p_min[idx].min(p_max[idx]);
            max[idx] = p_max[idx].max(p_min[idx]);
        }
        Self { p_min: min, p_max: max }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn center(&self) -> Vector3f {
        0.5f32 * self.p_min + 0.5f32 * self.p_max
    }

    pub fn expand_by_point(&mut self, p: &Vector3f) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(p[idx]);
            self.p_max[idx] = self.p_max[idx].max(p[idx]);
        }
    }

    pub fn expand_by_aabb(&mut self, other: &AABB) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(other.p_min[idx]);
            self.p_max[idx] = self.p_max[idx].max(other.p_max[idx]);
        }
    }

    pub fn contains(&self, p: &Vector3f) -> bool {
        (0..3).all(|idx| p[idx] >= self.p_min[idx] && p[idx] <= self.p_max[idx])
    }

    /// Slab test against the ray's inverse direction. The far distance is
    /// inflated by `1 + 2 * gamma(3)` so rounding never produces a false miss.
    pub fn ray_intersect(&self, ray: &Ray3f) -> bool {
        if !self.is_valid() {
            return false;
        }

        let o = ray.origin();
        let inv_dir = ray.inv_dir();
        let mut t_near = -FLOAT_INFINITY;
        let mut t_far = FLOAT_INFINITY;

        for idx in 0..3 {
            let t0 = (self.p_min[idx] - o[idx]) * inv_dir[idx];
            let t1 = (self.p_max[idx] - o[idx]) * inv_dir[idx];
            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1));
        }

        t_far *= 1.0 + 2.0 * gamma(3);

        if t_far <= MIN_FAR_T {
            return false;
        }
        if t_near > t_far {
            return false;
        }
        if t_near > ray.max_t {
            return false;
        }

        true
    }

    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        2.0f32 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    pub fn volume(&self) -> Float {
        let d = self.diagonal();
        d.x * d.y * d.z
    }

    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    pub fn max_extent(&self) -> Int {
        let diagonal = self.diagonal();
        if diagonal[0] > diagonal[1] && diagonal[0] > diagonal[2] {
            0
        } else if diagonal[1] > diagonal[2] {
            1
        } else {
            2
        }
    }

    /// Position of `p` relative to the box, `[0, 1]^3` for points inside it.
    pub fn offset(&self, p: &Vector3f) -> Result<Vector3f> {
        let diagonal = self.diagonal();
        if !self.is_valid() || (0..3).any(|idx| !(diagonal[idx] > 0.0)) {
            return Err(RenderError::DegenerateGeometry(
                format!("offset queried on a box with extent ({}, {}, {})",
                        diagonal.x, diagonal.y, diagonal.z)));
        }
        let delta = p - self.p_min;
        Ok(delta.component_div(&diagonal))
    }

    pub fn is_valid(&self) -> bool {
        (0..3).all(|idx| self.p_min[idx] <= self.p_max[idx])
    }
}

/* Test for AABB */
#[cfg(test)]
mod tests {
    use super::AABB;
    use super::Ray3f;
    use super::Vector3f;

    #[test]
    fn test_aabb_geometry() {
        let min = Vector3f::new(1.0, 7.0, 3.0);
        let max = Vector3f::new(4.0, 4.0, 4.0);
        let mut bbox: AABB = AABB::new(min, max);

        let center = bbox.center();
        assert!((center[0] - 2.5f32).abs() < 1e-6);
        assert!((center[1] - 5.5f32).abs() < 1e-6);
        assert!((center[2] - 3.5f32).abs() < 1e-6);

        assert!((bbox.surface_area() - 30.0f32).abs() < 1e-5);
        assert!((bbox.volume() - 9.0f32).abs() < 1e-5);
        // x and y extents tie at 3; ties resolve to the later axis.
        assert_eq!(bbox.max_extent(), 1);

        bbox.expand_by_point(&Vector3f::new(-1.0, 5.0, 6.0));
        assert_eq!(bbox.p_min[0], -1.0);
        assert_eq!(bbox.p_max[2], 6.0);
        assert_eq!(bbox.max_extent(), 0);

        let mut bbox1: AABB = AABB::default();
        bbox1.expand_by_aabb(&bbox);
        assert_eq!(bbox1, bbox);

        bbox1.reset();
        assert!(!bbox1.is_valid());
    }

    #[test]
    fn test_aabb_expand_contains_points() {
        let points = [
            Vector3f::new(0.3, -2.0, 5.0),
            Vector3f::new(-7.0, 1.5, 0.0),
            Vector3f::new(2.0, 2.0, -3.25),
        ];
        let mut bbox = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 1.0, 1.0));
        for p in &points {
            bbox.expand_by_point(p);
        }
        for p in &points {
            assert!(bbox.contains(p));
        }

        let mut from_empty = AABB::empty();
        from_empty.expand_by_point(&points[0]);
        assert!(from_empty.is_valid());
        assert_eq!(from_empty.p_min, points[0]);
        assert_eq!(from_empty.p_max, points[0]);
    }

    #[test]
    fn test_aabb_intersect() {
        let o1 = Vector3f::new(0.0, 0.0, 0.0);
        let d1 = Vector3f::new(1.0, 1.0, 1.0);

        let bbox = AABB::new(Vector3f::new(-1.0, -1.0, -1.0),
                             Vector3f::new(1.0, 1.0, 1.0));

        let r1 = Ray3f::new(o1, d1, Some(0.0), Some(1.0));
        let r2 = Ray3f::new(o1, d1, Some(0.0), Some(10.0));
        assert_eq!(bbox.ray_intersect(&r1), true);
        assert_eq!(bbox.ray_intersect(&r2), true);

        let o2 = Vector3f::new(-1.1, 0.0, 0.0);
        let d2 = Vector3f::new(-0.1, 10.0, 10.0);
        let r3 = Ray3f::new(o2, d2, None, None);
        assert_eq!(bbox.ray_intersect(&r3), false);
    }

    #[test]
    fn test_aabb_rejects_box_behind_ray() {
        let bbox = AABB::new(Vector3f::new(-1.0, -1.0, -1.0),
                             Vector3f::new(1.0, 1.0, 1.0));
        let behind = Ray3f::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert!(!bbox.ray_intersect(&behind));

        let facing = Ray3f::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        assert!(bbox.ray_intersect(&facing));

        let too_short = Ray3f::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0), None, Some(2.0));
        assert!(!bbox.ray_intersect(&too_short));
    }

    #[test]
    fn test_aabb_origin_inside_always_hits() {
        let bbox = AABB::new(Vector3f::new(-2.0, 0.5, 3.0), Vector3f::new(1.0, 4.0, 3.5));
        let origin = Vector3f::new(-0.5, 1.0, 3.2);
        let dirs = [
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(-1.0, 0.0, 0.0),
            Vector3f::new(0.0, -1.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(-0.3, 0.7, -0.2),
            Vector3f::new(0.9, -0.9, 0.1),
        ];
        for d in &dirs {
            let ray = Ray3f::new(origin, *d, None, None);
            assert!(bbox.ray_intersect(&ray));
        }
    }

    #[test]
    fn test_aabb_empty_box_never_hit() {
        let bbox = AABB::empty();
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert!(!bbox.ray_intersect(&ray));
    }

    #[test]
    fn test_aabb_offset() {
        let bbox = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(2.0, 4.0, 8.0));
        let o = bbox.offset(&Vector3f::new(1.0, 1.0, 2.0)).expect("offset");
        assert!((o - Vector3f::new(0.5, 0.25, 0.25)).norm() < 1e-6);

        let flat = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(2.0, 0.0, 8.0));
        assert!(flat.offset(&Vector3f::zeros()).is_err());
    }
}

// Copyright @yucwang 2023

use crate::math::constants::{Float, Vector2f, Vector3f};

/// Nearest-hit record. `geo_normal` always points out of the shape, so a
/// ray with `dir.dot(n) < 0` is entering it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceIntersection {
    p: Vector3f,
    geo_normal: Vector3f,
    uv: Vector2f,
    t: Float,
    object: usize,
}

impl SurfaceIntersection {
    pub fn new(new_p: Vector3f,
               new_geo_normal: Vector3f,
               new_uv: Vector2f,
               new_t: Float) -> Self {
        Self { p: new_p, geo_normal: new_geo_normal, uv: new_uv, t: new_t, object: 0 }
    }

    pub fn with_object(mut self, object: usize) -> Self {
        self.object = object;
        self
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn geo_normal(&self) -> Vector3f {
        self.geo_normal
    }

    /// Index of the scene object that was hit.
    pub fn object(&self) -> usize {
        self.object
    }
}

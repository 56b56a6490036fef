// Copyright @yucwang 2026

use crate::math::constants::Vector2f;
use crate::math::ray::Ray3f;

pub trait Sensor: Sync {
    /// Primary ray through film position `u` in `[0, 1]^2`, `(0, 0)` top-left.
    fn sample_ray(&self, u: &Vector2f) -> Ray3f;
    fn describe(&self) -> String {
        String::from("Sensor")
    }
}

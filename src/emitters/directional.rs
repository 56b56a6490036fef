// Copyright @yucwang 2026

use crate::core::emitter::{Emitter, EmitterSample};
use crate::math::constants::{Vector3f, FLOAT_MAX};
use crate::math::spectrum::RGBSpectrum;

pub struct DirectionalEmitter {
    /// Direction the light travels in.
    pub direction: Vector3f,
    pub irradiance: RGBSpectrum,
}

impl DirectionalEmitter {
    pub fn new_with(direction: Vector3f, irradiance: RGBSpectrum) -> Self {
        Self { direction, irradiance }
    }
}

impl Emitter for DirectionalEmitter {
    fn sample_li(&self, _p: &Vector3f) -> Option<EmitterSample> {
        let len = self.direction.norm();
        if !(len > 0.0) {
            return None;
        }
        Some(EmitterSample {
            direction: -self.direction / len,
            distance: FLOAT_MAX,
            radiance: self.irradiance,
        })
    }

    fn describe(&self) -> String {
        format!("DirectionalEmitter(direction = {:?})", self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_emitter_points_against_travel() {
        let light = DirectionalEmitter::new_with(Vector3f::new(0.0, -2.0, 0.0), RGBSpectrum::ones());
        let s = light.sample_li(&Vector3f::new(5.0, 1.0, 3.0)).expect("sample");
        assert_eq!(s.direction, Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(s.distance, FLOAT_MAX);
        assert!(DirectionalEmitter::new_with(Vector3f::zeros(), RGBSpectrum::ones()).sample_li(&Vector3f::zeros()).is_none());
    }
}

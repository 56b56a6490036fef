// Copyright @yucwang 2026

use crate::core::emitter::{Emitter, EmitterSample};
use crate::math::constants::Vector3f;
use crate::math::spectrum::RGBSpectrum;

pub struct PointEmitter {
    pub position: Vector3f,
    pub intensity: RGBSpectrum,
}

impl PointEmitter {
    pub fn new_with(position: Vector3f, intensity: RGBSpectrum) -> Self {
        Self { position, intensity }
    }
}

impl Emitter for PointEmitter {
    fn sample_li(&self, p: &Vector3f) -> Option<EmitterSample> {
        let to_light = self.position - p;
        let dist2 = to_light.norm_squared();
        if !(dist2 > 0.0) {
            return None;
        }
        let distance = dist2.sqrt();
        Some(EmitterSample {
            direction: to_light / distance,
            distance,
            radiance: self.intensity / dist2,
        })
    }

    fn describe(&self) -> String {
        format!("PointEmitter(position = {:?})", self.position)
    }
}

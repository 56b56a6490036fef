// Copyright @yucwang 2021

pub mod bsdf;
pub mod emitter;
pub mod error;
pub mod integrator;
pub mod interaction;
pub mod material;
pub mod medium;
pub mod phase;
pub mod rng;
pub mod scene;
pub mod sensor;
pub mod settings;
pub mod shape;
pub mod texture;

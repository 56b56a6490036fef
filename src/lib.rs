// Copyright @yucwang 2021

pub mod core;
pub mod emitters;
pub mod io;
pub mod materials;
pub mod math;
pub mod media;
pub mod sensors;
pub mod shapes;

pub use crate::core::error::{RenderError, Result};
pub use crate::core::integrator::PathTracer;
pub use crate::core::settings::RenderSettings;

// Copyright @yucwang 2026

pub mod density_grid;
pub mod heterogeneous_medium;
pub mod homogeneous_medium;

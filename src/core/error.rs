// Copyright @yucwang 2026

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by scene assets and the render lifecycle. Path
/// termination (roulette, iteration caps) is never reported through here.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load {}: {}", .path.display(), .reason)]
    Load { path: PathBuf, reason: String },

    #[error("failed to write {}: {}", .path.display(), .reason)]
    Write { path: PathBuf, reason: String },

    #[error("render called before begin_render or after end_render")]
    NotInitialized,

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("invalid medium: {0}")]
    InvalidMedium(String),

    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    #[error("buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}

impl RenderError {
    pub fn load<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        RenderError::Load { path: path.into(), reason: reason.into() }
    }

    pub fn write<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        RenderError::Write { path: path.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

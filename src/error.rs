//! # Error Module
//!
//! Error types shared by the sponge generator, the command line front end
//! and the renderers.

use thiserror::Error;

/// Contract violations detected by the subdivision engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpongeError {
    /// The cube edge length is zero, negative, or not a finite number.
    #[error("invalid cube size {size}: edge length must be a positive finite number")]
    InvalidGeometry { size: f64 },
    /// One of the origin coordinates is NaN or infinite.
    #[error("invalid cube origin ({x}, {y}, {z}): coordinates must be finite")]
    InvalidOrigin { x: f64, y: f64, z: f64 },
}

/// Errors in the user supplied command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("expected exactly one argument, got {got}")]
    InvalidArgumentCount { got: usize },
    #[error("depth must be a non-negative integer, got {value:?}")]
    InvalidDepthFormat { value: String },
}

/// Failures while producing a picture of the sponge.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed render config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid render config: {0}")]
    InvalidConfig(String),
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Geometry(#[from] SpongeError),
    #[error("viewer window failed: {0}")]
    Gui(String),
}

//! Error types for the renderer's outer surfaces.
//!
//! Intersection and scattering never fail; only loading textures, building
//! the worker pool and writing images can.

use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture has no pixels: {0}")]
    Empty(String),
}

/// Errors that can occur while rendering or saving an image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Render cancelled after {completed} of {total} buckets")]
    Cancelled { completed: usize, total: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;
pub type RenderResult<T> = Result<T, RenderError>;

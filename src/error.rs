//! Errors raised by the terrain preprocessing pipelines.
//!
//! Every variant names the stage that failed so the binaries can abort with a
//! message the user can act on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("decode failed for {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("search failed: no resolution of a {width}x{height} image stays under a budget of {budget} samples")]
    Search { width: u32, height: u32, budget: i64 },

    #[error("resample failed: cannot resize {from_width}x{from_height} to {to_width}x{to_height}")]
    Resample {
        from_width: u32,
        from_height: u32,
        to_width: u32,
        to_height: u32,
    },

    #[error("degenerate {what}: value range is zero (min {min}, max {max})")]
    Degenerate { what: &'static str, min: f32, max: f32 },

    #[error("write failed for {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preview failed: {0}")]
    Preview(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::Write {
            path: path.into(),
            source,
        }
    }
}

//! Terrain preprocessing library
//!
//! Produces elevation, biome and color grids for a heightmap renderer, either
//! from seeded noise or from a photo. Re-exports modules for use by binaries.

pub mod biomes;
pub mod error;
pub mod export;
pub mod grid;
pub mod heightmap;
pub mod resize;
pub mod terrain;
pub mod viewer;

pub use error::{PipelineError, Result};
pub use grid::Grid;

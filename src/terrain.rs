//! Procedural elevation fields from seeded coherent noise.

use std::path::{Path, PathBuf};

use noise::{NoiseFn, OpenSimplex};

use crate::biomes::{self, Biome};
use crate::error::{PipelineError, Result};
use crate::export;
use crate::grid::Grid;

/// Pixels per cell in the saved preview image.
const PREVIEW_SCALE: u32 = 3;

/// Parameters for noise sampling
#[derive(Clone, Debug)]
pub struct NoiseParams {
    /// Cell coordinates are divided by this before sampling (higher = larger features)
    pub scale: f64,
    /// Number of noise octaves. 1 samples the primitive once per cell.
    pub octaves: u32,
    /// Amplitude decay per octave (0.0-1.0)
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 10.0,
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Sample raw noise for every cell. Values are roughly in [-1, 1].
///
/// Cell (row, col) samples the noise at `(row / scale, col / scale)`.
pub fn sample_noise(rows: usize, cols: usize, seed: u32, params: &NoiseParams) -> Grid<f32> {
    let noise = OpenSimplex::new(seed);
    let octaves = params.octaves.max(1);

    Grid::from_fn(rows, cols, |row, col| {
        let x = row as f64 / params.scale;
        let y = col as f64 / params.scale;

        if octaves == 1 {
            return noise.get([x, y]) as f32;
        }

        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;
        let mut max_amp = 0.0;
        for _ in 0..octaves {
            total += noise.get([x * frequency, y * frequency]) * amplitude;
            max_amp += amplitude;
            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }
        (total / max_amp) as f32
    })
}

/// Linearly rescale a grid so its minimum maps to 0.0 and its maximum to 1.0.
pub fn normalize_min_max(grid: &Grid<f32>) -> Result<Grid<f32>> {
    let (min, max) = grid.min_max().ok_or(PipelineError::Degenerate {
        what: "noise field (empty grid)",
        min: 0.0,
        max: 0.0,
    })?;
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Err(PipelineError::Degenerate { what: "noise field", min, max });
    }
    Ok(grid.map(|&v| (v - min) / range))
}

/// Generate a normalized elevation grid for the given seed.
pub fn generate_elevation(
    rows: usize,
    cols: usize,
    seed: u32,
    params: &NoiseParams,
) -> Result<Grid<f32>> {
    let raw = sample_noise(rows, cols, seed, params);
    if let Some((min, max)) = raw.min_max() {
        log::debug!("raw noise range: {:.5} to {:.5}", min, max);
    }
    normalize_min_max(&raw)
}

/// A generated elevation field and its biome classification.
#[derive(Clone, Debug)]
pub struct NoiseTerrain {
    pub seed: u32,
    pub elevation: Grid<f32>,
    pub biomes: Grid<Biome>,
}

impl NoiseTerrain {
    pub fn generate(rows: usize, cols: usize, seed: u32, params: &NoiseParams) -> Result<Self> {
        let elevation = generate_elevation(rows, cols, seed, params)?;
        let biomes = biomes::classify_grid(&elevation);
        Ok(Self { seed, elevation, biomes })
    }

    /// Write `elevation.txt`, `biome.txt` and `preview.png` under `dir`.
    pub fn write_outputs(&self, dir: &Path) -> Result<TerrainFiles> {
        let files = TerrainFiles {
            elevation: dir.join("elevation.txt"),
            biomes: dir.join("biome.txt"),
            preview: dir.join("preview.png"),
        };
        export::write_biomes(&self.biomes, &files.biomes)?;
        export::write_elevation(&self.elevation, &files.elevation)?;
        export::save_preview(&export::render_biomes(&self.biomes, PREVIEW_SCALE), &files.preview)?;
        Ok(files)
    }
}

/// Paths written by [`NoiseTerrain::write_outputs`].
#[derive(Clone, Debug)]
pub struct TerrainFiles {
    pub elevation: PathBuf,
    pub biomes: PathBuf,
    pub preview: PathBuf,
}

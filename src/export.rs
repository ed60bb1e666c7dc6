//! Plain-text grid writers and PNG previews.
//!
//! All text formats are whitespace-delimited with one grid row per line and
//! five decimal places per value, which is what the heightmap renderer reads.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::biomes::Biome;
use crate::error::{PipelineError, Result};
use crate::grid::Grid;

/// Name and grid shape of a converted image, read by the renderer to locate
/// and size the elevation and color files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataRecord {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
}

/// Two lines: the name, then `rows cols`.
impl fmt::Display for MetadataRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{} {}", self.rows, self.cols)
    }
}

/// Create the parent directory of `path` if it has one.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| PipelineError::write(dir, e))
        }
        _ => Ok(()),
    }
}

/// Open `path` for writing, run `body`, and flush. Errors name the path.
fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| PipelineError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    body(&mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| PipelineError::write(path, e))
}

pub fn write_elevation_to<W: Write>(grid: &Grid<f32>, writer: &mut W) -> io::Result<()> {
    for row in grid.rows_iter() {
        let line: Vec<String> = row.iter().map(|v| format!("{:.5}", v)).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Each cell becomes three values, so a row holds `3 * cols` tokens.
pub fn write_rgb_to<W: Write>(grid: &Grid<[f32; 3]>, writer: &mut W) -> io::Result<()> {
    for row in grid.rows_iter() {
        let line: Vec<String> = row
            .iter()
            .map(|[r, g, b]| format!("{:.5} {:.5} {:.5}", r, g, b))
            .collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

pub fn write_elevation(grid: &Grid<f32>, path: &Path) -> Result<()> {
    write_file(path, |w| write_elevation_to(grid, w))
}

pub fn write_rgb(grid: &Grid<[f32; 3]>, path: &Path) -> Result<()> {
    write_file(path, |w| write_rgb_to(grid, w))
}

/// Write a biome grid as the RGB triples of each cell's band.
pub fn write_biomes(biomes: &Grid<Biome>, path: &Path) -> Result<()> {
    let colors = biomes.map(|b| b.color());
    write_rgb(&colors, path)
}

pub fn write_metadata(record: &MetadataRecord, path: &Path) -> Result<()> {
    write_file(path, |w| write!(w, "{}", record))
}

/// Width of the band legend, and of the blank gap before it, in grid cells.
const LEGEND_WIDTH: u32 = 4;
const LEGEND_GAP: u32 = 2;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Band drawn at row `y` of a legend `height` pixels tall. The eleven bands
/// get equal slices with the highest on top, as a discrete color bar.
fn legend_biome(y: u32, height: u32) -> Biome {
    let bands = Biome::ALL.len();
    let from_top = (y as usize * bands / height.max(1) as usize).min(bands - 1);
    Biome::ALL[bands - 1 - from_top]
}

/// Render a biome grid with its discrete palette, one pixel per cell scaled by `scale`,
/// followed on the right by a legend strip of the band colors.
/// Row `r` of the grid becomes image row `r`.
pub fn render_biomes(biomes: &Grid<Biome>, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let map_width = biomes.cols as u32 * scale;
    let legend_left = map_width + LEGEND_GAP * scale;
    let width = legend_left + LEGEND_WIDTH * scale;
    let height = biomes.rows as u32 * scale;
    ImageBuffer::from_fn(width, height, |x, y| {
        if x < map_width {
            Rgb(biomes.get((y / scale) as usize, (x / scale) as usize).rgb8())
        } else if x < legend_left {
            BACKGROUND
        } else {
            Rgb(legend_biome(y, height).rgb8())
        }
    })
}

/// Render normalized elevation as grayscale, black at 0.0 and white at 1.0.
pub fn render_elevation(elevation: &Grid<f32>, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let width = elevation.cols as u32 * scale;
    let height = elevation.rows as u32 * scale;
    ImageBuffer::from_fn(width, height, |x, y| {
        let v = *elevation.get((y / scale) as usize, (x / scale) as usize);
        let level = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb([level, level, level])
    })
}

pub fn save_preview(img: &RgbImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    img.save(path)
        .map_err(|e| PipelineError::Preview(format!("{}: {}", path.display(), e)))
}

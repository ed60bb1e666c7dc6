//! Image to heightmap conversion.
//!
//! A photo is shrunk to the largest aspect-preserving size that fits the
//! sample budget, mirrored left to right, and split into a luma elevation grid
//! and an RGB color grid of the same shape.

use std::path::{Path, PathBuf};

use image::{imageops, Rgb, RgbImage};

use crate::error::{PipelineError, Result};
use crate::export::{self, MetadataRecord};
use crate::grid::Grid;
use crate::resize::{self, ResizeSolution, DEFAULT_BUDGET};

/// Where and how a conversion writes its outputs.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    /// Largest sample value (exclusive) the chosen resolution may cost
    pub budget: i64,
    /// Elevation files are written here as `<name>.e`
    pub elevation_dir: PathBuf,
    /// Color files are written here as `<name>.rgb`
    pub rgb_dir: PathBuf,
    /// Metadata record path
    pub meta_path: PathBuf,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            elevation_dir: PathBuf::from("data/elevation"),
            rgb_dir: PathBuf::from("data/rgb"),
            meta_path: PathBuf::from("meta.data"),
        }
    }
}

impl ConvertConfig {
    pub fn elevation_path(&self, name: &str) -> PathBuf {
        self.elevation_dir.join(format!("{}.e", name))
    }

    pub fn rgb_path(&self, name: &str) -> PathBuf {
        self.rgb_dir.join(format!("{}.rgb", name))
    }
}

/// Grids produced from one image, before anything is written.
#[derive(Clone, Debug)]
pub struct Heightmap {
    pub solution: ResizeSolution,
    pub elevation: Grid<f32>,
    pub colors: Grid<[f32; 3]>,
}

/// Paths written by [`convert`].
#[derive(Clone, Debug)]
pub struct ConvertReport {
    pub metadata: MetadataRecord,
    pub elevation_path: PathBuf,
    pub rgb_path: PathBuf,
    pub meta_path: PathBuf,
}

/// Decode an image file and force it to 8-bit RGB.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|source| PipelineError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Base filename without directory or extension.
pub fn image_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// ITU-R 601-2 luma in 16-bit fixed point, rounded to nearest.
pub fn luma(Rgb([r, g, b]): Rgb<u8>) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

pub fn luma_grid(img: &RgbImage) -> Grid<u8> {
    Grid::from_fn(img.height() as usize, img.width() as usize, |row, col| {
        luma(*img.get_pixel(col as u32, row as u32))
    })
}

/// Divide every sample by the brightest one. No floor is subtracted, so a dark
/// image keeps its offset from zero. An all-black grid is degenerate.
pub fn elevation_from_luma(luma: &Grid<u8>) -> Result<Grid<f32>> {
    let max = luma.as_slice().iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Err(PipelineError::Degenerate {
            what: "image luma",
            min: 0.0,
            max: 0.0,
        });
    }
    let max = max as f64;
    Ok(luma.map(|&v| (v as f64 / max) as f32))
}

/// RGB of every pixel, channels divided by 255.
pub fn color_grid(img: &RgbImage) -> Grid<[f32; 3]> {
    Grid::from_fn(img.height() as usize, img.width() as usize, |row, col| {
        let Rgb(px) = *img.get_pixel(col as u32, row as u32);
        px.map(|c| c as f32 / 255.0)
    })
}

/// Resize, mirror and sample an already decoded image.
pub fn build_heightmap(img: &RgbImage, budget: i64) -> Result<Heightmap> {
    let solution = resize::find_best_resolution(img.width(), img.height(), budget)?;
    let resized = resize::box_resize(img, solution.width, solution.height)?;
    let mirrored = imageops::flip_horizontal(&resized);

    let elevation = elevation_from_luma(&luma_grid(&mirrored))?;
    let colors = color_grid(&mirrored);

    if let Some((min, max)) = elevation.min_max() {
        log::debug!("elevation range: {:.5} to {:.5}", min, max);
    }

    Ok(Heightmap { solution, elevation, colors })
}

/// Convert the image at `path` and write its elevation, color and metadata files.
pub fn convert(path: &Path, config: &ConvertConfig) -> Result<ConvertReport> {
    let name = image_name(path);
    let img = load_rgb(path)?;
    log::info!("decoded {} ({}x{})", path.display(), img.width(), img.height());

    let heightmap = build_heightmap(&img, config.budget)?;
    let metadata = MetadataRecord {
        name: name.clone(),
        rows: heightmap.elevation.rows,
        cols: heightmap.elevation.cols,
    };
    println!("rows: {} cols: {}", metadata.rows, metadata.cols);

    let elevation_path = config.elevation_path(&name);
    export::write_elevation(&heightmap.elevation, &elevation_path)?;
    println!("Normalized height map saved to {}", elevation_path.display());

    let rgb_path = config.rgb_path(&name);
    export::write_rgb(&heightmap.colors, &rgb_path)?;
    println!("Normalized colors saved to {}", rgb_path.display());

    export::write_metadata(&metadata, &config.meta_path)?;
    println!("Metadata saved to {}", config.meta_path.display());

    Ok(ConvertReport {
        metadata,
        elevation_path,
        rgb_path,
        meta_path: config.meta_path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    #[test]
    fn test_luma_weights() {
        assert_eq!(luma(Rgb([128, 128, 128])), 128);
        assert_eq!(luma(Rgb([255, 255, 255])), 255);
        assert_eq!(luma(Rgb([0, 0, 0])), 0);
        // 0.299 * 255 = 76.2
        assert_eq!(luma(Rgb([255, 0, 0])), 76);
        // 0.587 * 255 = 149.7
        assert_eq!(luma(Rgb([0, 255, 0])), 150);
        assert_eq!(luma(Rgb([0, 0, 255])), 29);
    }

    #[test]
    fn test_uniform_gray_is_all_ones() {
        let img: RgbImage = ImageBuffer::from_pixel(4, 4, Rgb([128, 128, 128]));
        let hm = build_heightmap(&img, 9000).unwrap();
        assert_eq!((hm.solution.width, hm.solution.height), (4, 4));
        assert!(hm.elevation.as_slice().iter().all(|&v| v == 1.0));
        let gray = 128.0 / 255.0;
        assert!(hm.colors.as_slice().iter().all(|c| *c == [gray, gray, gray]));
    }

    #[test]
    fn test_black_image_is_degenerate() {
        let img: RgbImage = ImageBuffer::from_pixel(4, 4, Rgb([0, 0, 0]));
        assert!(matches!(
            build_heightmap(&img, 9000),
            Err(PipelineError::Degenerate { .. })
        ));
    }

    #[test]
    fn test_output_is_mirrored() {
        // Bright left column, dark everywhere else
        let img: RgbImage = ImageBuffer::from_fn(3, 3, |x, _| {
            if x == 0 { Rgb([200, 200, 200]) } else { Rgb([50, 50, 50]) }
        });
        let hm = build_heightmap(&img, 9000).unwrap();
        assert_eq!((hm.elevation.rows, hm.elevation.cols), (3, 3));
        for row in 0..3 {
            assert_eq!(*hm.elevation.get(row, 2), 1.0);
            assert_eq!(*hm.elevation.get(row, 0), 50.0 / 200.0);
            assert_eq!(hm.colors.get(row, 2)[0], 200.0 / 255.0);
        }
    }

    #[test]
    fn test_no_floor_subtraction() {
        let img: RgbImage = ImageBuffer::from_fn(3, 2, |x, _| Rgb([100 + x as u8 * 50; 3]));
        let hm = build_heightmap(&img, 9000).unwrap();
        let (min, max) = hm.elevation.min_max().unwrap();
        assert_eq!(max, 1.0);
        assert_eq!(min, 0.5);
    }

    #[test]
    fn test_shape_follows_search() {
        let img: RgbImage = ImageBuffer::from_fn(100, 50, |x, y| Rgb([(x + y) as u8, 10, 20]));
        let hm = build_heightmap(&img, 9000).unwrap();
        assert_eq!(hm.elevation.cols, hm.solution.width as usize);
        assert_eq!(hm.elevation.rows, hm.solution.height as usize);
        assert_eq!((hm.colors.rows, hm.colors.cols), (hm.elevation.rows, hm.elevation.cols));
        assert!(hm.elevation.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(hm.elevation.as_slice().contains(&1.0));
    }

    #[test]
    fn test_image_name_strips_dir_and_extension() {
        assert_eq!(image_name(Path::new("photos/map.png")), "map");
        assert_eq!(image_name(Path::new("map")), "map");
        assert_eq!(image_name(Path::new("/tmp/a.b.jpg")), "a.b");
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = load_rgb(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
        assert!(err.to_string().contains("here.png"));
    }

    #[test]
    fn test_output_paths() {
        let config = ConvertConfig::default();
        assert_eq!(config.elevation_path("map"), PathBuf::from("data/elevation/map.e"));
        assert_eq!(config.rgb_path("map"), PathBuf::from("data/rgb/map.rgb"));
    }
}

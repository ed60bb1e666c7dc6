use minifb::{Key, KeyRepeat, Window, WindowOptions};

use image::RgbImage;

use crate::error::{PipelineError, Result};

/// View modes for the preview window
#[derive(Clone, Copy, Debug, PartialEq)]
enum ViewMode {
    Biomes,     // 1 - Discrete biome palette
    Elevation,  // 2 - Grayscale elevation
}

impl ViewMode {
    fn label(&self) -> &'static str {
        match self {
            ViewMode::Biomes => "Biomes",
            ViewMode::Elevation => "Elevation",
        }
    }
}

/// Pick an integer scale so the larger side lands near 900 pixels.
fn window_scale(width: usize, height: usize) -> usize {
    let target_size = 900;
    let larger = width.max(height).max(1);
    if larger > target_size {
        1
    } else {
        (target_size / larger).max(1)
    }
}

/// Convert an image to a 0RGB framebuffer of `frame_width`×`frame_height`, each
/// pixel repeated `scale` times per axis from the top-left corner. Uncovered
/// frame pixels stay black and image pixels past the frame are dropped.
fn to_buffer(img: &RgbImage, scale: usize, frame_width: usize, frame_height: usize) -> Vec<u32> {
    let mut buffer = vec![0u32; frame_width * frame_height];

    for (ix, iy, pixel) in img.enumerate_pixels() {
        let color = ((pixel[0] as u32) << 16) | ((pixel[1] as u32) << 8) | pixel[2] as u32;
        let ox = ix as usize * scale;
        if ox >= frame_width {
            continue;
        }
        let run = scale.min(frame_width - ox);
        for sy in 0..scale {
            let oy = iy as usize * scale + sy;
            if oy >= frame_height {
                break;
            }
            let row_start = oy * frame_width + ox;
            buffer[row_start..row_start + run].fill(color);
        }
    }

    buffer
}

/// Show the biome and elevation previews in a window.
/// Press 1-2 to switch views, Escape to exit. The window fits the larger of
/// the two images; the biome view carries its legend strip on the right.
pub fn show_preview(biomes: &RgbImage, elevation: &RgbImage) -> Result<()> {
    let width = biomes.width().max(elevation.width()) as usize;
    let height = biomes.height().max(elevation.height()) as usize;
    let scale = window_scale(width, height);
    let window_width = width * scale;
    let window_height = height * scale;

    let mut window = Window::new(
        "Terrain Preview - 1-2: Views, Esc: Exit",
        window_width,
        window_height,
        WindowOptions {
            resize: false,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| PipelineError::Preview(e.to_string()))?;

    // Limit to ~60fps
    window.set_target_fps(60);

    let biome_buffer = to_buffer(biomes, scale, window_width, window_height);
    let elevation_buffer = to_buffer(elevation, scale, window_width, window_height);
    let mut view_mode = ViewMode::Biomes;

    println!("Preview open. Controls:");
    println!("  1: Biomes");
    println!("  2: Elevation");
    println!("  Esc: Exit");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let new_mode = if window.is_key_pressed(Key::Key1, KeyRepeat::No) {
            Some(ViewMode::Biomes)
        } else if window.is_key_pressed(Key::Key2, KeyRepeat::No) {
            Some(ViewMode::Elevation)
        } else {
            None
        };

        if let Some(mode) = new_mode {
            if mode != view_mode {
                view_mode = mode;
                println!("View: {}", view_mode.label());
            }
        }

        let buffer = match view_mode {
            ViewMode::Biomes => &biome_buffer,
            ViewMode::Elevation => &elevation_buffer,
        };
        window
            .update_with_buffer(buffer, window_width, window_height)
            .map_err(|e| PipelineError::Preview(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_window_scale() {
        assert_eq!(window_scale(180, 200), 4);
        assert_eq!(window_scale(2000, 100), 1);
        assert_eq!(window_scale(0, 0), 900);
    }

    #[test]
    fn test_buffer_scaling() {
        let img: RgbImage = ImageBuffer::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        });
        let buffer = to_buffer(&img, 2, 4, 2);
        assert_eq!(buffer, vec![0xFF0000, 0xFF0000, 0x0000FF, 0x0000FF,
                                0xFF0000, 0xFF0000, 0x0000FF, 0x0000FF]);
    }

    #[test]
    fn test_narrow_image_leaves_frame_black() {
        let img: RgbImage = ImageBuffer::from_pixel(1, 1, Rgb([0, 255, 0]));
        let buffer = to_buffer(&img, 2, 3, 2);
        assert_eq!(buffer, vec![0x00FF00, 0x00FF00, 0,
                                0x00FF00, 0x00FF00, 0]);
    }
}

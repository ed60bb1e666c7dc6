//! Resolution search under a sample budget, and box-filter resampling.
//!
//! The downstream renderer triangulates the heightmap into two triangles per
//! grid cell, so a `w`×`h` grid costs `2·(w−1)·(h−1)` samples. The search picks
//! the aspect-preserving size with the largest cost still strictly under budget.

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::{PipelineError, Result};

/// Pixel budget used when none is configured.
pub const DEFAULT_BUDGET: i64 = 9000;

/// Support radius of the box kernel in destination pixels.
const BOX_SUPPORT: f64 = 0.5;

/// A chosen output resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeSolution {
    pub width: u32,
    pub height: u32,
    pub sample_value: i64,
}

/// Triangle-mesh cost of a `width`×`height` grid.
pub fn sample_value(width: u32, height: u32) -> i64 {
    2 * (width as i64 - 1) * (height as i64 - 1)
}

/// Search every width from 1 to `src_width` for the resolution with the largest
/// sample value strictly below `budget`.
///
/// Height follows the source aspect ratio with truncation: `h = w·H / W`.
/// Ties keep the smallest width. Fails if no candidate has a positive value.
pub fn find_best_resolution(src_width: u32, src_height: u32, budget: i64) -> Result<ResizeSolution> {
    let mut best: Option<ResizeSolution> = None;
    let mut best_value = 0i64;
    let mut accepted = 0usize;

    for width in 1..=src_width {
        let height = (width as u64 * src_height as u64 / src_width as u64) as u32;
        let value = sample_value(width, height);
        if value >= budget {
            continue;
        }
        accepted += 1;
        if value > best_value {
            best_value = value;
            best = Some(ResizeSolution { width, height, sample_value: value });
        }
    }

    log::debug!(
        "resolution search: {} of {} widths under budget {}",
        accepted,
        src_width,
        budget
    );

    best.ok_or(PipelineError::Search {
        width: src_width,
        height: src_height,
        budget,
    })
}

/// Fractional bits of the fixed-point filter weights.
const PRECISION_BITS: u32 = 22;

/// A contiguous run of source pixels and their fixed-point weights for one output pixel.
#[derive(Debug)]
struct Coefficients {
    start: usize,
    weights: Vec<i64>,
}

fn box_filter(x: f64) -> f64 {
    if x > -0.5 && x <= 0.5 {
        1.0
    } else {
        0.0
    }
}

/// Round a normalized weight to `PRECISION_BITS` fractional bits, half away from zero.
fn quantize(weight: f64) -> i64 {
    let scaled = weight * (1i64 << PRECISION_BITS) as f64;
    if scaled < 0.0 {
        (scaled - 0.5) as i64
    } else {
        (scaled + 0.5) as i64
    }
}

/// Weights for resampling one axis from `in_size` to `out_size` pixels.
///
/// When shrinking, the kernel widens with the scale factor so every source
/// pixel whose center falls inside an output pixel's footprint contributes
/// equally to it. Weights are normalized in f64, then quantized.
fn box_coefficients(in_size: u32, out_size: u32) -> Vec<Coefficients> {
    let scale = in_size as f64 / out_size as f64;
    let filter_scale = scale.max(1.0);
    let support = BOX_SUPPORT * filter_scale;
    let inv_scale = 1.0 / filter_scale;

    (0..out_size)
        .map(|out| {
            let center = (out as f64 + 0.5) * scale;
            let start = ((center - support + 0.5) as i64).max(0) as usize;
            let end = ((center + support + 0.5) as i64).min(in_size as i64) as usize;

            let mut weights: Vec<f64> = (start..end)
                .map(|x| box_filter((x as f64 - center + 0.5) * inv_scale))
                .collect();
            let total: f64 = weights.iter().sum();
            if total > 0.0 {
                for w in weights.iter_mut() {
                    *w /= total;
                }
            }
            Coefficients {
                start,
                weights: weights.into_iter().map(quantize).collect(),
            }
        })
        .collect()
}

/// Drop the fractional bits of an accumulator and clamp to a channel value.
fn clip_channel(acc: i64) -> u8 {
    (acc >> PRECISION_BITS).clamp(0, 255) as u8
}

fn resample_horizontal(img: &RgbImage, width: u32) -> RgbImage {
    let coeffs = box_coefficients(img.width(), width);
    let mut out: RgbImage = ImageBuffer::new(width, img.height());

    for y in 0..img.height() {
        for (x, c) in coeffs.iter().enumerate() {
            // Seeded with one half so the shift rounds to nearest
            let mut acc = [1i64 << (PRECISION_BITS - 1); 3];
            for (k, w) in c.weights.iter().enumerate() {
                let Rgb(px) = *img.get_pixel((c.start + k) as u32, y);
                for ch in 0..3 {
                    acc[ch] += px[ch] as i64 * w;
                }
            }
            out.put_pixel(x as u32, y, Rgb(acc.map(clip_channel)));
        }
    }
    out
}

fn resample_vertical(img: &RgbImage, height: u32) -> RgbImage {
    let coeffs = box_coefficients(img.height(), height);
    let mut out: RgbImage = ImageBuffer::new(img.width(), height);

    for (y, c) in coeffs.iter().enumerate() {
        for x in 0..img.width() {
            let mut acc = [1i64 << (PRECISION_BITS - 1); 3];
            for (k, w) in c.weights.iter().enumerate() {
                let Rgb(px) = *img.get_pixel(x, (c.start + k) as u32);
                for ch in 0..3 {
                    acc[ch] += px[ch] as i64 * w;
                }
            }
            out.put_pixel(x, y as u32, Rgb(acc.map(clip_channel)));
        }
    }
    out
}

/// Resize with a box (area-average) filter: horizontal pass, then vertical.
/// A pass whose dimension does not change is skipped.
pub fn box_resize(img: &RgbImage, width: u32, height: u32) -> Result<RgbImage> {
    if width == 0 || height == 0 || img.width() == 0 || img.height() == 0 {
        return Err(PipelineError::Resample {
            from_width: img.width(),
            from_height: img.height(),
            to_width: width,
            to_height: height,
        });
    }

    let horizontal = if width != img.width() {
        log::debug!("box resample: horizontal {} -> {}", img.width(), width);
        Some(resample_horizontal(img, width))
    } else {
        None
    };
    let source = horizontal.as_ref().unwrap_or(img);

    if height != source.height() {
        log::debug!("box resample: vertical {} -> {}", source.height(), height);
        Ok(resample_vertical(source, height))
    } else {
        Ok(source.clone())
    }
}

//! Generate a noise elevation field with its biome classification.

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use rand::Rng;

use terrain_prep::biomes;
use terrain_prep::export;
use terrain_prep::terrain::{NoiseParams, NoiseTerrain};
use terrain_prep::viewer;

#[derive(Parser, Debug)]
#[command(name = "noise_terrain")]
#[command(about = "Generate a procedural elevation field and biome map")]
struct Args {
    /// Number of grid rows
    #[arg(long, default_value = "200", value_parser = clap::value_parser!(u32).range(1..))]
    rows: u32,

    /// Number of grid columns
    #[arg(long, default_value = "180", value_parser = clap::value_parser!(u32).range(1..))]
    cols: u32,

    /// Noise seed (random 0-100 if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Cell coordinates are divided by this before sampling
    #[arg(long, default_value = "10.0")]
    scale: f64,

    /// Number of noise octaves (1 = single sample per cell)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=16))]
    octaves: u32,

    /// Directory for elevation.txt, biome.txt and preview.png
    #[arg(short, long, default_value = "data")]
    output_dir: PathBuf,

    /// Skip the preview window (preview.png is still written)
    #[arg(long)]
    no_show: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if !(args.scale > 0.0 && args.scale.is_finite()) {
        eprintln!("error: --scale must be a positive number, got {}", args.scale);
        process::exit(1);
    }

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen_range(0..=100));
    let params = NoiseParams {
        scale: args.scale,
        octaves: args.octaves,
        ..NoiseParams::default()
    };

    println!("Generating terrain with seed: {}", seed);
    println!("Grid size: {} rows x {} cols", args.rows, args.cols);

    let terrain = match NoiseTerrain::generate(args.rows as usize, args.cols as usize, seed, &params) {
        Ok(terrain) => terrain,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    for line in biomes::band_report(&terrain.biomes) {
        log::info!("{}", line);
    }

    let files = match terrain.write_outputs(&args.output_dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    println!("Biome map saved to {}", files.biomes.display());
    println!("Elevation saved to {}", files.elevation.display());
    println!("Preview saved to {}", files.preview.display());

    if !args.no_show {
        let biome_view = export::render_biomes(&terrain.biomes, 1);
        let elevation_view = export::render_elevation(&terrain.elevation, 1);
        if let Err(e) = viewer::show_preview(&biome_view, &elevation_view) {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;

use terrain_prep::heightmap::{self, ConvertConfig};
use terrain_prep::resize::DEFAULT_BUDGET;

#[derive(Parser, Debug)]
#[command(name = "heightmap_convert")]
#[command(about = "Convert an image into a budget-limited heightmap and color grid")]
struct Args {
    /// Input image path
    image: PathBuf,

    /// Exclusive upper bound on 2·(width−1)·(height−1) for the output grid
    #[arg(long, default_value_t = DEFAULT_BUDGET)]
    budget: i64,

    /// Directory for the elevation file (<name>.e)
    #[arg(long, default_value = "data/elevation")]
    elevation_dir: PathBuf,

    /// Directory for the color file (<name>.rgb)
    #[arg(long, default_value = "data/rgb")]
    rgb_dir: PathBuf,

    /// Metadata output path
    #[arg(long, default_value = "meta.data")]
    meta: PathBuf,
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

    let config = ConvertConfig {
        budget: args.budget,
        elevation_dir: args.elevation_dir,
        rgb_dir: args.rgb_dir,
        meta_path: args.meta,
    };

    if let Err(e) = heightmap::convert(&args.image, &config) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

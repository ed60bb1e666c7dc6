//! Elevation-banded biome classification
//!
//! Eleven fixed bands cover the normalized elevation range [0, 1]. Each band is
//! half-open (inclusive lower bound, exclusive upper bound) except the last,
//! which also takes 1.0. Classification depends on elevation only.

use crate::grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    DeepOcean,
    ShallowOcean,
    Coastal,
    Lowlands,
    Desert,
    Foothills,
    MountainBase,
    Hills,
    Mountains,
    HighMountains,
    HighestMountains,
}

impl Biome {
    /// All bands in ascending elevation order.
    pub const ALL: [Biome; 11] = [
        Biome::DeepOcean,
        Biome::ShallowOcean,
        Biome::Coastal,
        Biome::Lowlands,
        Biome::Desert,
        Biome::Foothills,
        Biome::MountainBase,
        Biome::Hills,
        Biome::Mountains,
        Biome::HighMountains,
        Biome::HighestMountains,
    ];

    /// Classify a normalized elevation into its band.
    pub fn classify(elevation: f32) -> Biome {
        match elevation {
            e if e < 0.05 => Biome::DeepOcean,
            e if e < 0.15 => Biome::ShallowOcean,
            e if e < 0.25 => Biome::Coastal,
            e if e < 0.35 => Biome::Lowlands,
            e if e < 0.45 => Biome::Desert,
            e if e < 0.55 => Biome::Foothills,
            e if e < 0.65 => Biome::MountainBase,
            e if e < 0.75 => Biome::Hills,
            e if e < 0.85 => Biome::Mountains,
            e if e < 0.95 => Biome::HighMountains,
            _ => Biome::HighestMountains,
        }
    }

    /// Elevation range `[lower, upper)` covered by this band.
    /// The top band's upper bound is 1.0 and is inclusive.
    pub fn band(&self) -> (f32, f32) {
        match self {
            Biome::DeepOcean => (0.0, 0.05),
            Biome::ShallowOcean => (0.05, 0.15),
            Biome::Coastal => (0.15, 0.25),
            Biome::Lowlands => (0.25, 0.35),
            Biome::Desert => (0.35, 0.45),
            Biome::Foothills => (0.45, 0.55),
            Biome::MountainBase => (0.55, 0.65),
            Biome::Hills => (0.65, 0.75),
            Biome::Mountains => (0.75, 0.85),
            Biome::HighMountains => (0.85, 0.95),
            Biome::HighestMountains => (0.95, 1.0),
        }
    }

    /// RGB color with channels in [0, 1], as written to the biome file.
    pub fn color(&self) -> [f32; 3] {
        match self {
            Biome::DeepOcean => [0.0, 0.0, 1.0],
            Biome::ShallowOcean => [0.0, 0.0, 0.5],
            Biome::Coastal => [0.0, 1.0, 0.0],
            Biome::Lowlands => [0.0, 0.5, 0.0],
            Biome::Desert => [0.8, 0.8, 0.0],
            Biome::Foothills => [0.5, 0.5, 0.0],
            Biome::MountainBase => [0.3, 0.3, 0.0],
            Biome::Hills => [0.7, 0.7, 0.7],
            Biome::Mountains => [0.5, 0.5, 0.5],
            Biome::HighMountains => [0.8, 0.8, 0.8],
            Biome::HighestMountains => [1.0, 1.0, 1.0],
        }
    }

    /// 8-bit color for previews.
    pub fn rgb8(&self) -> [u8; 3] {
        self.color().map(|c| (c * 255.0).round() as u8)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Biome::DeepOcean => "Deep Ocean",
            Biome::ShallowOcean => "Shallow Ocean",
            Biome::Coastal => "Coastal Area",
            Biome::Lowlands => "Lowlands",
            Biome::Desert => "Desert",
            Biome::Foothills => "Foothills",
            Biome::MountainBase => "Mountain Base",
            Biome::Hills => "Hills",
            Biome::Mountains => "Mountains",
            Biome::HighMountains => "High Mountains",
            Biome::HighestMountains => "Highest Mountains",
        }
    }
}

/// Classify every cell of a normalized elevation grid.
pub fn classify_grid(elevation: &Grid<f32>) -> Grid<Biome> {
    elevation.map(|&e| Biome::classify(e))
}

/// Count cells per band, in ascending band order.
pub fn band_counts(biomes: &Grid<Biome>) -> [usize; 11] {
    let mut counts = [0usize; 11];
    for (_, _, biome) in biomes.iter() {
        counts[*biome as usize] += 1;
    }
    counts
}

/// One line per band with its elevation range and share of the grid, e.g.
/// `        Deep Ocean [0.00, 0.05):   3.2%`.
pub fn band_report(biomes: &Grid<Biome>) -> Vec<String> {
    let total = biomes.len().max(1) as f64;
    Biome::ALL
        .iter()
        .zip(band_counts(biomes))
        .map(|(biome, count)| {
            let (lower, upper) = biome.band();
            let close = if *biome == Biome::HighestMountains { ']' } else { ')' };
            format!(
                "{:>18} [{:.2}, {:.2}{}: {:5.1}%",
                biome.label(),
                lower,
                upper,
                close,
                100.0 * count as f64 / total
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_lower_bounds_are_inclusive() {
        assert_eq!(Biome::classify(0.0), Biome::DeepOcean);
        assert_eq!(Biome::classify(0.049999), Biome::DeepOcean);
        assert_eq!(Biome::classify(0.05), Biome::ShallowOcean);
        assert_eq!(Biome::classify(0.15), Biome::Coastal);
        assert_eq!(Biome::classify(0.95), Biome::HighestMountains);
        assert_eq!(Biome::classify(1.0), Biome::HighestMountains);
    }

    #[test]
    fn test_bands_are_contiguous() {
        let mut expected_lower = 0.0;
        for biome in Biome::ALL {
            let (lower, upper) = biome.band();
            assert_eq!(lower, expected_lower, "{} starts at a gap", biome.label());
            assert!(upper > lower);
            expected_lower = upper;
        }
        assert_eq!(expected_lower, 1.0);
    }

    #[test]
    fn test_random_elevations_land_in_their_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            let e: f32 = rng.gen_range(0.0..=1.0);
            let biome = Biome::classify(e);
            let (lower, upper) = biome.band();
            assert!(e >= lower, "{} below band of {}", e, biome.label());
            if biome == Biome::HighestMountains {
                assert!(e <= upper);
            } else {
                assert!(e < upper, "{} above band of {}", e, biome.label());
            }
            let matches = Biome::ALL.iter().filter(|b| b.color() == biome.color()).count();
            assert_eq!(matches, 1);
        }
    }

    #[test]
    fn test_classify_grid_keeps_shape() {
        let elevation = Grid::from_fn(3, 4, |r, c| (r * 4 + c) as f32 / 11.0);
        let biomes = classify_grid(&elevation);
        assert_eq!((biomes.rows, biomes.cols), (3, 4));
        assert_eq!(*biomes.get(0, 0), Biome::DeepOcean);
        assert_eq!(*biomes.get(2, 3), Biome::HighestMountains);
        assert_eq!(band_counts(&biomes).iter().sum::<usize>(), 12);
    }

    #[test]
    fn test_band_report_lines() {
        let elevation = Grid::from_vec(1, 4, vec![0.0f32, 0.01, 0.5, 1.0]).unwrap();
        let report = band_report(&classify_grid(&elevation));
        assert_eq!(report.len(), 11);
        assert_eq!(report[0], "        Deep Ocean [0.00, 0.05):  50.0%");
        assert_eq!(report[5], "         Foothills [0.45, 0.55):  25.0%");
        assert!(report[1].ends_with("):   0.0%"));
        assert_eq!(report[10], " Highest Mountains [0.95, 1.00]:  25.0%");
    }

    #[test]
    fn test_rgb8_palette() {
        assert_eq!(Biome::DeepOcean.rgb8(), [0, 0, 255]);
        assert_eq!(Biome::ShallowOcean.rgb8(), [0, 0, 128]);
        assert_eq!(Biome::HighestMountains.rgb8(), [255, 255, 255]);
    }
}

//! Procedural point generation

use crate::point::*;
use crate::point_set::PointSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for generating a random point cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub point_count: usize,
    /// Coordinates are drawn from `(-half_extent, half_extent]`
    pub half_extent: f32,
    pub base_color: Rgb,
    /// Fixed seed for reproducible clouds, fresh entropy when `None`
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            point_count: 1000,
            half_extent: 5.0,
            base_color: HOTPINK,
            seed: None,
        }
    }
}

/// Generate a point set using the config's seed, or entropy when unseeded
pub fn generate_points(config: &GeneratorConfig) -> PointSet {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_points_with(config, &mut rng)
}

/// Generate a point set from an explicit random source
///
/// Every coordinate is sampled independently and uniformly; every point starts
/// out with the base color.
pub fn generate_points_with<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> PointSet {
    let n = config.point_count;
    let extent = config.half_extent;

    let positions: Vec<f32> = (0..n * 3)
        .map(|_| extent - rng.gen::<f32>() * extent * 2.0)
        .collect();

    let mut colors = vec![0.0f32; n * 3];
    for offset in (0..n * 3).step_by(3) {
        config.base_color.write_to(&mut colors, offset);
    }

    debug!(points = n, seed = ?config.seed, "generated point set");

    PointSet::from_aligned(positions, colors)
}

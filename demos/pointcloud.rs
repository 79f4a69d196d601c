//! Hoverable Particle Cloud Demo
//!
//! Opens a window with a cloud of random points drawn as round dots under an
//! orthographic camera. Moving the mouse over a point turns it white; moving
//! away turns it back to hot pink.
//!
//! Set `RUST_LOG=debug` for more detailed logs.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dotcloud_visualization::{SceneConfig, Viewer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pointcloud", about = "Interactive hover-highlighted particle cloud")]
struct Args {
    /// JSON scene config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of points to generate
    #[arg(long)]
    points: Option<usize>,

    /// Seed for a reproducible cloud
    #[arg(long)]
    seed: Option<u64>,

    /// Camera zoom in pixels per world unit
    #[arg(long)]
    zoom: Option<f32>,

    /// Pick radius around each point in world units
    #[arg(long)]
    threshold: Option<f32>,

    /// Dot size in pixels
    #[arg(long)]
    size: Option<f32>,
}

impl Args {
    fn scene_config(&self) -> anyhow::Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SceneConfig::default(),
        };

        if let Some(points) = self.points {
            config.point_count = points;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(zoom) = self.zoom {
            config.zoom = zoom;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(size) = self.size {
            config.material.size = size;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.scene_config()?;

    info!(points = config.point_count, seed = ?config.seed, "starting particle cloud demo");
    Viewer::new(config)?.with_title("Hoverable Particle Cloud").run()?;

    Ok(())
}

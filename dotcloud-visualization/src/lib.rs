//! Visualization for the dotcloud particle cloud
//!
//! This crate ties the pieces together using wgpu and winit:
//! - Orthographic camera with pointer picking rays
//! - Scene composition and configuration
//! - Interactive viewer window

pub mod camera;
pub mod scene;
pub mod viewer;

pub use camera::*;
pub use scene::*;
pub use viewer::*;

use dotcloud_core::Result;

/// Show the hoverable particle cloud in an interactive viewer
pub fn show_particles(config: SceneConfig) -> Result<()> {
    Viewer::new(config)?.run()
}

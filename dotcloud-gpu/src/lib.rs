//! # dotcloud GPU
//!
//! wgpu rendering for the dotcloud particle cloud.
//!
//! Points are drawn as instanced screen-aligned quads whose fragment stage
//! masks out everything beyond a circle, so every point shows as a round dot.
//! Position and color attributes live in separate vertex buffers; only the
//! color buffer is rewritten after hover changes.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dotcloud_gpu::{DotMaterial, DotRenderer, RenderConfig};
//!
//! async fn example(window: Arc<winit::window::Window>) -> dotcloud_core::Result<()> {
//!     let renderer = DotRenderer::new(window, DotMaterial::default(), RenderConfig::default()).await?;
//!     // ... sync_points, update_camera, render
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod material;
pub mod renderer;

// Re-export commonly used items
pub use device::GpuContext;
pub use material::{DotMaterial, DOT_SHADER};
pub use renderer::{DotRenderer, DotUniform, RenderConfig, instance_buffer_layouts};

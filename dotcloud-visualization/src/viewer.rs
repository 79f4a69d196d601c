//! Window and event loop for the particle scene

use std::sync::Arc;

use dotcloud_core::{Drawable, Error, Result};
use dotcloud_gpu::{DotRenderer, RenderConfig};
use tracing::{debug, error, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use crate::scene::{Scene, SceneConfig};

/// Interactive viewer for the hoverable particle cloud
pub struct Viewer {
    config: SceneConfig,
    title: String,
}

impl Viewer {
    /// Create a new viewer
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            title: "dotcloud".to_string(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Open the window and run until it is closed
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
        let [width, height] = self.config.window_size;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(width, height))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );

        let scale_factor = window.scale_factor();
        let size = window.inner_size().to_logical::<f32>(scale_factor);
        let mut scene = Scene::mount(&self.config, size.width, size.height)?;
        scene.set_scale_factor(scale_factor);
        let (min, max) = scene.particles.points().bounding_box();
        debug!(?min, ?max, "particle bounds");

        let render_config = RenderConfig {
            background_color: self.config.background_color,
            ..RenderConfig::default()
        };
        let mut renderer = pollster::block_on(DotRenderer::new(window.clone(), scene.material, render_config))?;
        info!("viewer initialized");

        let mut failure: Option<Error> = None;
        window.request_redraw();

        event_loop
            .run(|event, target| {
                target.set_control_flow(ControlFlow::Wait);

                let Event::WindowEvent { event, .. } = event else {
                    return;
                };

                match event {
                    WindowEvent::CloseRequested => target.exit(),
                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        scene.resize_physical(new_size);
                        window.request_redraw();
                    }
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        // A Resized event with the new physical size follows
                        debug!(scale_factor, "scale factor changed");
                        scene.set_scale_factor(scale_factor);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        scene.pointer_moved_physical(position);
                        if scene.particles.points().colors().needs_update {
                            window.request_redraw();
                        }
                    }
                    WindowEvent::CursorLeft { .. } => {
                        scene.pointer_left();
                        window.request_redraw();
                    }
                    WindowEvent::RedrawRequested => {
                        renderer.update_camera(scene.camera.view_matrix(), scene.camera.projection_matrix());
                        let generation = scene.particles.generation();
                        renderer.sync_points(scene.particles.points_mut(), generation);

                        if let Err(e) = renderer.render() {
                            error!("Render error: {}", e);
                            failure = Some(e);
                            target.exit();
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))?;

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

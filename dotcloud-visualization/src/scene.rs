//! Scene composition: camera, particles and picking parameters

use std::path::Path;

use dotcloud_core::{Error, GeneratorConfig, Palette, Particles, RaycastParams, Result};
use dotcloud_gpu::DotMaterial;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use winit::dpi::{PhysicalPosition, PhysicalSize};

use crate::camera::OrthographicCamera;

/// Everything needed to mount the particle scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub point_count: usize,
    pub seed: Option<u64>,
    pub zoom: f32,
    pub camera_position: [f32; 3],
    /// Pick radius around each point in world units
    pub threshold: f32,
    pub material: DotMaterial,
    pub palette: Palette,
    pub background_color: [f64; 4],
    pub window_size: [u32; 2],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            point_count: 1000,
            seed: None,
            zoom: 40.0,
            camera_position: [0.0, 0.0, 100.0],
            threshold: 0.2,
            material: DotMaterial::default(),
            palette: Palette::default(),
            background_color: [0.1, 0.1, 0.1, 1.0],
            window_size: [1200, 800],
        }
    }
}

impl SceneConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid scene config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading scene config");
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.zoom.is_nan() || self.zoom <= 0.0 {
            return Err(Error::Config(format!("zoom must be positive, got {}", self.zoom)));
        }
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(Error::Config(format!("threshold must not be negative, got {}", self.threshold)));
        }
        if self.material.size.is_nan() || self.material.size <= 0.0 {
            return Err(Error::Config(format!("point size must be positive, got {}", self.material.size)));
        }

        // The camera looks at the origin with +Y up
        let position = Vector3::from(self.camera_position);
        if !position.iter().all(|c| c.is_finite()) || position.norm() == 0.0 {
            return Err(Error::Config(format!(
                "camera_position must be finite and away from the origin, got {:?}",
                self.camera_position
            )));
        }
        if position.cross(&Vector3::y()).norm() <= f32::EPSILON * position.norm() {
            return Err(Error::Config(format!(
                "camera_position must not lie on the up axis, got {:?}",
                self.camera_position
            )));
        }
        Ok(())
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            point_count: self.point_count,
            seed: self.seed,
            base_color: self.palette.base,
            ..GeneratorConfig::default()
        }
    }
}

/// The mounted scene: a fixed orthographic camera looking at the particles
///
/// The camera works in logical pixels so `zoom` means the same on every
/// display; physical window sizes and cursor positions are divided by the
/// scale factor first.
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: OrthographicCamera,
    pub particles: Particles,
    pub raycast: RaycastParams,
    pub material: DotMaterial,
    scale_factor: f64,
}

impl Scene {
    /// Mount the scene for a viewport of `width` x `height` logical pixels
    pub fn mount(config: &SceneConfig, width: f32, height: f32) -> Result<Self> {
        config.validate()?;

        let [x, y, z] = config.camera_position;
        let mut camera = OrthographicCamera::new(Point3::new(x, y, z), config.zoom, (width, height));
        camera.set_viewport(width, height);

        let raycast = RaycastParams {
            threshold: config.threshold,
            ..RaycastParams::default()
        };

        let particles = Particles::new(config.generator_config(), config.palette);
        info!(points = particles.point_count(), zoom = config.zoom, threshold = config.threshold, "mounted scene");

        Ok(Self {
            camera,
            particles,
            raycast,
            material: config.material,
            scale_factor: 1.0,
        })
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Pointer moved to logical pixel position `(x, y)`
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let ray = self.camera.ray_from_cursor(x, y);
        self.particles.pointer_move(&ray, &self.raycast);
    }

    /// Pointer left the viewport
    pub fn pointer_left(&mut self) {
        self.particles.pointer_leave();
    }

    /// Viewport resized to `width` x `height` logical pixels
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    pub fn pointer_moved_physical(&mut self, position: PhysicalPosition<f64>) {
        let logical = position.to_logical::<f32>(self.scale_factor);
        self.pointer_moved(logical.x, logical.y);
    }

    pub fn resize_physical(&mut self, size: PhysicalSize<u32>) {
        let logical = size.to_logical::<f32>(self.scale_factor);
        self.resize(logical.width, logical.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotcloud_core::{HOTPINK, WHITE};

    fn seeded_scene() -> Scene {
        let config = SceneConfig { seed: Some(99), ..Default::default() };
        Scene::mount(&config, 800.0, 600.0).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SceneConfig::default();
        assert_eq!(config.point_count, 1000);
        assert_eq!(config.zoom, 40.0);
        assert_eq!(config.camera_position, [0.0, 0.0, 100.0]);
        assert_eq!(config.threshold, 0.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_config() {
        let config = SceneConfig::from_json_str(r#"{ "point_count": 12, "seed": 3, "material": { "size": 8.0 } }"#).unwrap();
        assert_eq!(config.point_count, 12);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.material.size, 8.0);
        assert_eq!(config.material.scale, 1.0);
        assert_eq!(config.zoom, 40.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(SceneConfig::from_json_str(r#"{ "zoom": 0.0 }"#), Err(Error::Config(_))));
        assert!(matches!(SceneConfig::from_json_str(r#"{ "threshold": -1.0 }"#), Err(Error::Config(_))));
        assert!(matches!(SceneConfig::from_json_str("not json"), Err(Error::Config(_))));
    }

    #[test]
    fn test_degenerate_camera_position_rejected() {
        for position in [[0.0, 0.0, 0.0], [0.0, 50.0, 0.0], [0.0, -3.0, 0.0], [f32::NAN, 0.0, 100.0]] {
            let config = SceneConfig { camera_position: position, ..Default::default() };
            assert!(matches!(config.validate(), Err(Error::Config(_))), "{:?}", position);
        }
        assert!(matches!(
            SceneConfig::from_json_str(r#"{ "camera_position": [0.0, 0.0, 0.0] }"#),
            Err(Error::Config(_))
        ));

        let tilted = SceneConfig { camera_position: [0.0, 50.0, 1.0], ..Default::default() };
        assert!(tilted.validate().is_ok());
    }

    #[test]
    fn test_mount_generates_points() {
        let scene = seeded_scene();
        assert_eq!(scene.particles.points().len(), 1000);
        assert_eq!(scene.raycast.threshold, 0.2);
    }

    #[test]
    fn test_raycast_range_is_unbounded() {
        let scene = seeded_scene();
        assert_eq!(scene.raycast.near, 0.0);
        assert!(scene.raycast.far.is_infinite());
    }

    #[test]
    fn test_physical_input_uses_logical_pixels() {
        let config = SceneConfig { seed: Some(99), ..Default::default() };
        let mut scene = Scene::mount(&config, 800.0, 600.0).unwrap();
        scene.set_scale_factor(2.0);
        scene.resize_physical(PhysicalSize::new(1600, 1200));
        assert_eq!(scene.camera.viewport, (800.0, 600.0));
        // Zoom stays 40 logical pixels per world unit on a 2x display
        assert_eq!(scene.camera.half_extents(), (10.0, 7.5));

        let target = scene.particles.points().position(17);
        let (x, y) = scene.camera.world_to_screen(&target);
        scene.pointer_moved_physical(PhysicalPosition::new(x as f64 * 2.0, y as f64 * 2.0));
        let hovered: Vec<usize> = scene.particles.hover().hovered().collect();
        assert_eq!(hovered.len(), 1);
        assert!(scene.particles.points().position(hovered[0]).coords.xy().metric_distance(&target.coords.xy()) <= 0.2);
    }

    #[test]
    fn test_hover_point_on_screen() {
        let mut scene = seeded_scene();
        let index = 17;
        let target = scene.particles.points().position(index);
        let (x, y) = scene.camera.world_to_screen(&target);

        scene.pointer_moved(x, y);
        let hovered: Vec<usize> = scene.particles.hover().hovered().collect();
        // The nearest hit stops propagation, so exactly one point lights up
        assert_eq!(hovered.len(), 1);
        assert_eq!(scene.particles.points().color(hovered[0]), WHITE);

        // Far off-screen: nothing is hit and the point is restored
        scene.pointer_moved(-1000.0, -1000.0);
        assert_eq!(scene.particles.points().color(hovered[0]), HOTPINK);

        scene.pointer_moved(x, y);
        scene.pointer_left();
        assert_eq!(scene.particles.hover().hovered().count(), 0);
    }
}

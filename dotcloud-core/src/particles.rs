//! The hoverable particle cloud component

use crate::generator::{generate_points, GeneratorConfig};
use crate::hover::HoverDispatcher;
use crate::interaction::HighlightHandler;
use crate::picking::{raycast_points, Ray, RaycastParams};
use crate::point::Palette;
use crate::point_set::PointSet;
use tracing::{debug, info};

/// A randomly generated point cloud whose points light up under the pointer
///
/// The point set is generated on construction and regenerated only when the
/// point count changes.
#[derive(Debug, Clone)]
pub struct Particles {
    config: GeneratorConfig,
    points: PointSet,
    handler: HighlightHandler,
    hover: HoverDispatcher,
    generation: u64,
}

impl Particles {
    /// Mount the component, generating its points
    pub fn new(config: GeneratorConfig, palette: Palette) -> Self {
        let config = GeneratorConfig { base_color: palette.base, ..config };
        let points = generate_points(&config);
        info!(points = points.len(), "mounted particles");
        Self {
            config,
            points,
            handler: HighlightHandler::new(palette),
            hover: HoverDispatcher::new(),
            generation: 0,
        }
    }

    pub fn point_count(&self) -> usize {
        self.config.point_count
    }

    /// Change the point count, regenerating the buffers only if it differs
    ///
    /// Returns `true` when the point set was replaced.
    pub fn set_point_count(&mut self, point_count: usize) -> bool {
        if point_count == self.config.point_count {
            return false;
        }
        self.config.point_count = point_count;
        self.points = generate_points(&self.config);
        self.hover.reset();
        self.generation += 1;
        debug!(points = point_count, generation = self.generation, "regenerated particles");
        true
    }

    /// Counter bumped every time the point set is replaced
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut PointSet {
        &mut self.points
    }

    pub fn palette(&self) -> Palette {
        self.handler.palette
    }

    pub fn hover(&self) -> &HoverDispatcher {
        &self.hover
    }

    /// Pick points along `ray` and deliver hover events
    pub fn pointer_move(&mut self, ray: &Ray, params: &RaycastParams) {
        let hits = raycast_points(&self.points, ray, params);
        self.hover.dispatch(&hits, &mut self.handler, &mut self.points);
    }

    /// The pointer left the view
    pub fn pointer_leave(&mut self) {
        self.hover.clear(&mut self.handler, &mut self.points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Point3f, Vector3f, HOTPINK, WHITE};

    fn particles(count: usize) -> Particles {
        let config = GeneratorConfig { point_count: count, seed: Some(5), ..Default::default() };
        Particles::new(config, Palette::default())
    }

    fn ray_through(p: Point3f) -> Ray {
        Ray::new(Point3f::new(p.x, p.y, 100.0), Vector3f::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_memoized_on_point_count() {
        let mut particles = particles(100);
        let before = particles.points().clone();

        assert!(!particles.set_point_count(100));
        assert_eq!(particles.points(), &before);
        assert_eq!(particles.generation(), 0);

        assert!(particles.set_point_count(20));
        assert_eq!(particles.points().len(), 20);
        assert_eq!(particles.generation(), 1);
    }

    #[test]
    fn test_pointer_move_highlights_and_leave_restores() {
        let mut particles = particles(10);
        let target = particles.points().position(4);
        let ray = ray_through(target);
        let params = RaycastParams { threshold: 1e-4, ..Default::default() };

        particles.pointer_move(&ray, &params);
        assert_eq!(particles.points().color(4), WHITE);
        assert!(particles.hover().is_hovered(4));
        assert!(particles.points().colors().needs_update);

        particles.pointer_leave();
        assert_eq!(particles.points().color(4), HOTPINK);
        assert!(!particles.hover().is_hovered(4));
    }

    #[test]
    fn test_only_nearest_of_stacked_points_highlights() {
        let positions = vec![0.0, 0.0, -1.0, 0.0, 0.0, 1.0, 3.0, 3.0, 3.0];
        let colors = vec![1.0, 105.0 / 255.0, 180.0 / 255.0].repeat(3);
        let mut particles = particles(3);
        *particles.points_mut() = PointSet::from_arrays(positions, colors).unwrap();

        particles.pointer_move(&ray_through(Point3f::origin()), &RaycastParams::default());
        assert_eq!(particles.points().color(1), WHITE);
        assert_eq!(particles.points().color(0), HOTPINK);
        assert_eq!(particles.points().color(2), HOTPINK);
    }
}

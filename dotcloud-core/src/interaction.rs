//! Pointer events and hover highlighting

use crate::picking::RaycastHit;
use crate::point::*;
use crate::point_set::PointSet;

/// A pointer event targeting a single point of a point set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Index of the point under the pointer
    pub index: usize,
    pub distance: f32,
    pub distance_to_ray: f32,
    pub point: Point3f,
    stopped: bool,
}

impl PointerEvent {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            distance: 0.0,
            distance_to_ray: 0.0,
            point: Point3f::origin(),
            stopped: false,
        }
    }

    /// Keep the event from reaching points behind this one
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl From<&RaycastHit> for PointerEvent {
    fn from(hit: &RaycastHit) -> Self {
        Self {
            index: hit.index,
            distance: hit.distance,
            distance_to_ray: hit.distance_to_ray,
            point: hit.point,
            stopped: false,
        }
    }
}

/// Callbacks invoked when the pointer enters or leaves a point
pub trait PointerHandler {
    fn on_pointer_enter(&mut self, event: &mut PointerEvent, points: &mut PointSet);

    fn on_pointer_leave(&mut self, event: &mut PointerEvent, points: &mut PointSet);
}

/// Swaps a point's color to the highlight color while hovered
///
/// Indices are trusted: an index outside the point set panics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HighlightHandler {
    pub palette: Palette,
}

impl HighlightHandler {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl PointerHandler for HighlightHandler {
    fn on_pointer_enter(&mut self, event: &mut PointerEvent, points: &mut PointSet) {
        event.stop_propagation();
        points.set_color(event.index, self.palette.highlight);
    }

    fn on_pointer_leave(&mut self, event: &mut PointerEvent, points: &mut PointSet) {
        points.set_color(event.index, self.palette.base);
    }
}

//! Hover tracking and enter/leave dispatch

use std::collections::{BTreeMap, HashSet};

use crate::interaction::{PointerEvent, PointerHandler};
use crate::picking::RaycastHit;
use crate::point_set::PointSet;
use tracing::trace;

/// A hovered point and whether its enter handler stopped propagation
#[derive(Debug, Clone, Copy)]
struct HoveredPoint {
    hit: RaycastHit,
    stopped: bool,
}

/// Tracks which points are hovered and turns successive hit lists into
/// pointer-enter and pointer-leave calls
#[derive(Debug, Clone, Default)]
pub struct HoverDispatcher {
    hovered: BTreeMap<usize, HoveredPoint>,
}

impl HoverDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hovered(&self, index: usize) -> bool {
        self.hovered.contains_key(&index)
    }

    /// Indices currently hovered, ascending
    pub fn hovered(&self) -> impl Iterator<Item = usize> + '_ {
        self.hovered.keys().copied()
    }

    /// Deliver a pointer move with `hits` sorted nearest first
    ///
    /// Points no longer hit leave. Newly hit points enter in depth order until
    /// a handler stops propagation, which also makes every hovered point
    /// behind the stopping one leave. A still-hovered point whose enter
    /// stopped propagation keeps blocking the points behind it.
    pub fn dispatch<H>(&mut self, hits: &[RaycastHit], handler: &mut H, points: &mut PointSet)
    where
        H: PointerHandler + ?Sized,
    {
        let mut seen = HashSet::new();
        let hits: Vec<RaycastHit> = hits.iter().filter(|h| seen.insert(h.index)).copied().collect();

        let current: HashSet<usize> = hits.iter().map(|h| h.index).collect();
        self.leave_all_except(&current, handler, points);

        for (i, hit) in hits.iter().enumerate() {
            let stopped = match self.hovered.get(&hit.index) {
                Some(hovered) => hovered.stopped,
                None => {
                    let mut event = PointerEvent::from(hit);
                    trace!(index = hit.index, distance = hit.distance, "pointer enter");
                    handler.on_pointer_enter(&mut event, points);
                    self.hovered.insert(
                        hit.index,
                        HoveredPoint { hit: *hit, stopped: event.is_stopped() },
                    );
                    event.is_stopped()
                }
            };

            if stopped {
                let keep: HashSet<usize> = hits[..=i].iter().map(|h| h.index).collect();
                self.leave_all_except(&keep, handler, points);
                break;
            }
        }
    }

    /// Pointer left the surface: every hovered point leaves
    pub fn clear<H>(&mut self, handler: &mut H, points: &mut PointSet)
    where
        H: PointerHandler + ?Sized,
    {
        self.leave_all_except(&HashSet::new(), handler, points);
    }

    /// Forget hover state without firing events, for when the point set was replaced
    pub fn reset(&mut self) {
        self.hovered.clear();
    }

    fn leave_all_except<H>(&mut self, keep: &HashSet<usize>, handler: &mut H, points: &mut PointSet)
    where
        H: PointerHandler + ?Sized,
    {
        let leaving: Vec<RaycastHit> = self
            .hovered
            .values()
            .map(|h| h.hit)
            .filter(|h| !keep.contains(&h.index))
            .collect();

        for hit in leaving {
            self.hovered.remove(&hit.index);
            let mut event = PointerEvent::from(&hit);
            trace!(index = hit.index, "pointer leave");
            handler.on_pointer_leave(&mut event, points);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point3f;

    /// Records calls and optionally stops propagation on enter
    #[derive(Default)]
    struct Recorder {
        stop: bool,
        calls: Vec<(&'static str, usize)>,
    }

    impl PointerHandler for Recorder {
        fn on_pointer_enter(&mut self, event: &mut PointerEvent, _points: &mut PointSet) {
            if self.stop {
                event.stop_propagation();
            }
            self.calls.push(("enter", event.index));
        }

        fn on_pointer_leave(&mut self, event: &mut PointerEvent, _points: &mut PointSet) {
            self.calls.push(("leave", event.index));
        }
    }

    fn hit(index: usize, distance: f32) -> RaycastHit {
        RaycastHit {
            index,
            distance,
            distance_to_ray: 0.0,
            point: Point3f::origin(),
        }
    }

    fn points() -> PointSet {
        PointSet::from_arrays(vec![0.0; 15], vec![0.0; 15]).unwrap()
    }

    #[test]
    fn test_enter_all_without_stop() {
        let mut points = points();
        let mut dispatcher = HoverDispatcher::new();
        let mut handler = Recorder::default();

        dispatcher.dispatch(&[hit(2, 1.0), hit(0, 2.0)], &mut handler, &mut points);
        assert_eq!(handler.calls, vec![("enter", 2), ("enter", 0)]);
        assert_eq!(dispatcher.hovered().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_stop_propagation_only_nearest_enters() {
        let mut points = points();
        let mut dispatcher = HoverDispatcher::new();
        let mut handler = Recorder { stop: true, ..Default::default() };

        dispatcher.dispatch(&[hit(3, 1.0), hit(1, 2.0)], &mut handler, &mut points);
        assert_eq!(handler.calls, vec![("enter", 3)]);
        assert!(dispatcher.is_hovered(3));
        assert!(!dispatcher.is_hovered(1));
    }

    #[test]
    fn test_missing_hits_leave() {
        let mut points = points();
        let mut dispatcher = HoverDispatcher::new();
        let mut handler = Recorder { stop: true, ..Default::default() };

        dispatcher.dispatch(&[hit(3, 1.0)], &mut handler, &mut points);
        dispatcher.dispatch(&[hit(4, 1.0)], &mut handler, &mut points);
        assert_eq!(handler.calls, vec![("enter", 3), ("leave", 3), ("enter", 4)]);

        dispatcher.dispatch(&[], &mut handler, &mut points);
        assert_eq!(handler.calls.last(), Some(&("leave", 4)));
        assert_eq!(dispatcher.hovered().count(), 0);
    }

    #[test]
    fn test_nearer_point_evicts_hovered_point_behind() {
        let mut points = points();
        let mut dispatcher = HoverDispatcher::new();
        let mut handler = Recorder { stop: true, ..Default::default() };

        dispatcher.dispatch(&[hit(1, 5.0)], &mut handler, &mut points);
        dispatcher.dispatch(&[hit(2, 1.0), hit(1, 5.0)], &mut handler, &mut points);
        assert_eq!(handler.calls, vec![("enter", 1), ("enter", 2), ("leave", 1)]);
        assert_eq!(dispatcher.hovered().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_hovered_point_keeps_blocking_points_behind() {
        let mut points = points();
        let mut dispatcher = HoverDispatcher::new();
        let mut handler = Recorder { stop: true, ..Default::default() };

        // Point 0 in front, point 1 behind it; point 1 first comes into range later
        dispatcher.dispatch(&[hit(0, 99.0)], &mut handler, &mut points);
        dispatcher.dispatch(&[hit(0, 99.0), hit(1, 101.0)], &mut handler, &mut points);
        assert_eq!(handler.calls, vec![("enter", 0)]);
        assert_eq!(dispatcher.hovered().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_non_stopping_hovered_point_lets_events_through() {
        let mut points = points();
        let mut dispatcher = HoverDispatcher::new();
        let mut handler = Recorder::default();

        dispatcher.dispatch(&[hit(0, 1.0)], &mut handler, &mut points);
        dispatcher.dispatch(&[hit(0, 1.0), hit(1, 2.0)], &mut handler, &mut points);
        assert_eq!(handler.calls, vec![("enter", 0), ("enter", 1)]);
    }

    #[test]
    fn test_still_hovered_point_gets_no_event() {
        let mut points = points();
        let mut dispatcher = HoverDispatcher::new();
        let mut handler = Recorder { stop: true, ..Default::default() };

        dispatcher.dispatch(&[hit(1, 1.0)], &mut handler, &mut points);
        dispatcher.dispatch(&[hit(1, 1.0)], &mut handler, &mut points);
        assert_eq!(handler.calls, vec![("enter", 1)]);
    }

    #[test]
    fn test_clear_leaves_everything() {
        let mut points = points();
        let mut dispatcher = HoverDispatcher::new();
        let mut handler = Recorder::default();

        dispatcher.dispatch(&[hit(0, 1.0), hit(4, 2.0)], &mut handler, &mut points);
        dispatcher.clear(&mut handler, &mut points);
        assert_eq!(&handler.calls[2..], &[("leave", 0), ("leave", 4)]);
        assert_eq!(dispatcher.hovered().count(), 0);
    }

    #[test]
    fn test_duplicate_hits_are_ignored() {
        let mut points = points();
        let mut dispatcher = HoverDispatcher::new();
        let mut handler = Recorder::default();

        dispatcher.dispatch(&[hit(2, 1.0), hit(2, 1.5)], &mut handler, &mut points);
        assert_eq!(handler.calls, vec![("enter", 2)]);
    }
}

//! Core traits for dotcloud

use crate::{point::*, point_set::*};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

impl Drawable for PointSet {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        let mut positions = self.iter_positions();
        let Some(first) = positions.next() else {
            return (Point3f::origin(), Point3f::origin());
        };

        positions.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p)))
    }
}

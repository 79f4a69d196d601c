//! Point set data structures

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A flat `f32` vertex attribute with `item_size` components per point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferAttribute {
    pub array: Vec<f32>,
    pub item_size: usize,
    /// Set when the array changed since the last GPU upload
    pub needs_update: bool,
    pub version: u32,
}

impl BufferAttribute {
    /// Create an attribute from a flat array
    ///
    /// The array length must be a multiple of `item_size`.
    pub fn new(array: Vec<f32>, item_size: usize) -> Self {
        debug_assert!(item_size > 0 && array.len() % item_size == 0);
        Self {
            array,
            item_size,
            needs_update: false,
            version: 0,
        }
    }

    /// Number of items (points) in the attribute
    pub fn count(&self) -> usize {
        self.array.len() / self.item_size
    }

    /// Flag the attribute for re-upload before the next frame
    pub fn mark_dirty(&mut self) {
        self.needs_update = true;
        self.version = self.version.wrapping_add(1);
    }

    /// Clear the dirty flag after upload
    pub fn mark_uploaded(&mut self) {
        self.needs_update = false;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.array
    }
}

/// Index-aligned positions and colors of a particle cloud
///
/// Point `i` occupies offsets `3i..3i + 3` in both arrays. The arrays are
/// allocated once and never resized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    positions: BufferAttribute,
    colors: BufferAttribute,
}

impl PointSet {
    /// Create a point set from flat position and color arrays
    pub fn from_arrays(positions: Vec<f32>, colors: Vec<f32>) -> crate::Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(crate::Error::InvalidData(format!(
                "position array length {} is not a multiple of 3",
                positions.len()
            )));
        }
        if positions.len() != colors.len() {
            return Err(crate::Error::InvalidData(format!(
                "position array length {} does not match color array length {}",
                positions.len(),
                colors.len()
            )));
        }
        Ok(Self::from_aligned(positions, colors))
    }

    pub(crate) fn from_aligned(positions: Vec<f32>, colors: Vec<f32>) -> Self {
        debug_assert_eq!(positions.len(), colors.len());
        Self {
            positions: BufferAttribute::new(positions, 3),
            colors: BufferAttribute::new(colors, 3),
        }
    }

    /// Get the number of points in the set
    pub fn len(&self) -> usize {
        self.positions.count()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.positions.array.is_empty()
    }

    pub fn positions(&self) -> &BufferAttribute {
        &self.positions
    }

    pub fn colors(&self) -> &BufferAttribute {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut BufferAttribute {
        &mut self.colors
    }

    /// Position of point `index`
    pub fn position(&self, index: usize) -> Point3f {
        let p = &self.positions.array[index * 3..index * 3 + 3];
        Point3f::new(p[0], p[1], p[2])
    }

    /// Color of point `index`
    pub fn color(&self, index: usize) -> Rgb {
        Rgb::read_from(&self.colors.array, index * 3)
    }

    /// Overwrite the color of point `index` and mark the color buffer dirty
    ///
    /// Panics if `index` is out of range.
    pub fn set_color(&mut self, index: usize, color: Rgb) {
        color.write_to(&mut self.colors.array, index * 3);
        self.colors.mark_dirty();
    }

    /// Iterate over all positions
    pub fn iter_positions(&self) -> impl Iterator<Item = Point3f> + '_ {
        self.positions
            .array
            .chunks_exact(3)
            .map(|p| Point3f::new(p[0], p[1], p[2]))
    }
}

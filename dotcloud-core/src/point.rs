//! Point and color types

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use bytemuck::{Pod, Zeroable};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// An RGB color with floating point channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Neutral color of an unselected point (`#ff69b4`)
pub const HOTPINK: Rgb = Rgb {
    r: 1.0,
    g: 105.0 / 255.0,
    b: 180.0 / 255.0,
};

/// Highlight color of a hovered point
pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Write the three channels into `array` starting at `offset`
    ///
    /// Panics if `array` is shorter than `offset + 3`.
    pub fn write_to(self, array: &mut [f32], offset: usize) {
        array[offset..offset + 3].copy_from_slice(&self.to_array());
    }

    /// Read three channels from `array` starting at `offset`
    pub fn read_from(array: &[f32], offset: usize) -> Self {
        Self::new(array[offset], array[offset + 1], array[offset + 2])
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// The base/highlight color pair used by hover highlighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub base: Rgb,
    pub highlight: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: HOTPINK,
            highlight: WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hotpink_channels() {
        assert_relative_eq!(HOTPINK.r, 1.0);
        assert_relative_eq!(HOTPINK.g, 105.0 / 255.0);
        assert_relative_eq!(HOTPINK.b, 180.0 / 255.0);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex(0xff69b4), HOTPINK);
        assert_eq!(Rgb::from_hex(0xffffff), WHITE);
    }

    #[test]
    fn test_write_to_offset() {
        let mut array = vec![0.0f32; 9];
        WHITE.write_to(&mut array, 3);
        assert_eq!(array, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(Rgb::read_from(&array, 3), WHITE);
    }
}

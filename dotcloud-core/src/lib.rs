//! Core data structures and interaction logic for dotcloud
//!
//! This crate provides the CPU side of the hoverable particle cloud:
//! point and color types, the flat vertex buffers of a point set, random
//! point generation, ray picking and hover highlighting.

pub mod point;
pub mod point_set;
pub mod generator;
pub mod picking;
pub mod interaction;
pub mod hover;
pub mod particles;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_set::*;
pub use generator::*;
pub use picking::*;
pub use interaction::*;
pub use hover::*;
pub use particles::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4};

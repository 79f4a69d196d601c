//! Ray casting against point sets

use crate::point::*;
use crate::point_set::PointSet;

/// A ray with a unit-length direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vector3f,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Point3f, direction: Vector3f) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Point3f {
        self.origin + self.direction * t
    }

    /// Closest point on the ray to `point`, clamped to the origin
    pub fn closest_point_to_point(&self, point: &Point3f) -> Point3f {
        let t = (point - self.origin).dot(&self.direction);
        if t < 0.0 {
            self.origin
        } else {
            self.at(t)
        }
    }

    pub fn distance_sq_to_point(&self, point: &Point3f) -> f32 {
        (self.closest_point_to_point(point) - point).norm_squared()
    }
}

/// Intersection limits for point picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastParams {
    /// Maximum distance between the ray and a point for it to count as hit
    pub threshold: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RaycastParams {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}

/// A point hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub index: usize,
    /// Distance from the ray origin to the hit location
    pub distance: f32,
    /// Distance between the ray and the point itself
    pub distance_to_ray: f32,
    /// Location on the ray closest to the point
    pub point: Point3f,
}

/// Find every point within `params.threshold` of the ray, nearest first
pub fn raycast_points(points: &PointSet, ray: &Ray, params: &RaycastParams) -> Vec<RaycastHit> {
    let threshold_sq = params.threshold * params.threshold;

    let mut hits: Vec<RaycastHit> = points
        .iter_positions()
        .enumerate()
        .filter_map(|(index, position)| {
            let dist_sq = ray.distance_sq_to_point(&position);
            if dist_sq >= threshold_sq {
                return None;
            }
            let point = ray.closest_point_to_point(&position);
            let distance = (point - ray.origin).norm();
            if distance < params.near || distance > params.far {
                return None;
            }
            Some(RaycastHit {
                index,
                distance,
                distance_to_ray: dist_sq.sqrt(),
                point,
            })
        })
        .collect();

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

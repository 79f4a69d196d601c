//! Camera utilities for 3D visualization

use dotcloud_core::{Point3f, Ray, Vector3f};
use nalgebra::{Matrix4, Orthographic3, Point3, Vector3};

/// Maps OpenGL clip-space depth `[-1, 1]` to wgpu's `[0, 1]`
#[rustfmt::skip]
pub fn opengl_to_wgpu_matrix() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// An orthographic camera whose frustum is sized in viewport pixels
///
/// One world unit spans `zoom` pixels on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicCamera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub zoom: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport width and height in pixels
    pub viewport: (f32, f32),
}

impl OrthographicCamera {
    /// Create a new camera looking at the origin
    pub fn new(position: Point3<f32>, zoom: f32, viewport: (f32, f32)) -> Self {
        Self {
            position,
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            zoom,
            near: 0.1,
            far: 1000.0,
            viewport,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width.max(1.0), height.max(1.0));
    }

    /// Half extents of the visible area in world units
    pub fn half_extents(&self) -> (f32, f32) {
        (
            self.viewport.0 / (2.0 * self.zoom),
            self.viewport.1 / (2.0 * self.zoom),
        )
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix with wgpu depth conventions
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let (hw, hh) = self.half_extents();
        let ortho = Orthographic3::new(-hw, hw, -hh, hh, self.near, self.far);
        opengl_to_wgpu_matrix() * ortho.into_inner()
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Orthonormal camera basis `(right, up, forward)`
    fn basis(&self) -> (Vector3f, Vector3f, Vector3f) {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(&self.up).normalize();
        let up = right.cross(&forward);
        (right, up, forward)
    }

    /// Picking ray through a cursor position in pixels, origin on the near plane
    pub fn ray_from_cursor(&self, x: f32, y: f32) -> Ray {
        let ndc_x = 2.0 * x / self.viewport.0 - 1.0;
        let ndc_y = 1.0 - 2.0 * y / self.viewport.1;
        let (hw, hh) = self.half_extents();
        let (right, up, forward) = self.basis();

        let origin = self.position + forward * self.near + right * (ndc_x * hw) + up * (ndc_y * hh);
        Ray::new(origin, forward)
    }

    /// Pixel position of a world point
    pub fn world_to_screen(&self, point: &Point3f) -> (f32, f32) {
        let ndc = self.view_projection_matrix().transform_point(point);
        (
            (ndc.x + 1.0) * 0.5 * self.viewport.0,
            (1.0 - ndc.y) * 0.5 * self.viewport.1,
        )
    }
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 100.0), 40.0, (800.0, 600.0))
    }
}

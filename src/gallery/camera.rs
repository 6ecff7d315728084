//! Fixed perspective camera at the centre of the ring
//!
//! Sits at the origin looking down -Z; only the aspect ratio changes at runtime.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Perspective camera at the ring centre.
#[derive(Debug, Clone)]
pub struct GalleryCamera {
    /// Eye position
    position: Vec3,
    /// Point the camera looks at
    target: Vec3,
    /// Aspect ratio (width/height) for projection
    aspect: f32,
    /// Vertical field of view in radians
    fov: f32,
    /// Near clipping plane
    near: f32,
    /// Far clipping plane
    far: f32,
}

impl GalleryCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            aspect,
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio on resize
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Project a world point to screen pixels (origin top-left).
    pub fn world_to_screen(&self, point: Vec3, width: f32, height: f32) -> Vec2 {
        let ndc = self.view_projection_matrix().project_point3(point);
        Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height)
    }
}

impl Default for GalleryCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default(), 16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_projects_to_screen_centre() {
        let camera = GalleryCamera::default();
        let screen = camera.world_to_screen(Vec3::new(0.0, 0.0, -4.0), 1280.0, 720.0);
        assert!(screen.abs_diff_eq(Vec2::new(640.0, 360.0), 1e-3));
    }

    #[test]
    fn test_left_is_left() {
        let camera = GalleryCamera::default();
        let screen = camera.world_to_screen(Vec3::new(-1.0, 1.0, -4.0), 1280.0, 720.0);
        assert!(screen.x < 640.0);
        assert!(screen.y < 360.0);
    }

    #[test]
    fn test_set_aspect() {
        let mut camera = GalleryCamera::default();
        camera.set_aspect(2.0);
        assert_eq!(camera.aspect(), 2.0);
    }
}

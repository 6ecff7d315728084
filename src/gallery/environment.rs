//! Static lighting and the reflective floor.

use glam::{Mat4, Vec3};

use crate::config::hex_to_linear;

/// Cone light above and in front of the ring.
#[derive(Debug, Clone)]
pub struct SpotLight {
    pub position: Vec3,
    /// Point the cone is aimed at
    pub target: Vec3,
    /// Linear RGB
    pub color: [f32; 3],
    pub intensity: f32,
    /// Range after which the light has no effect
    pub distance: f32,
    /// Half-angle of the cone in radians
    pub angle: f32,
    /// Fraction of the cone that is softened (0-1)
    pub penumbra: f32,
    /// Distance falloff exponent
    pub decay: f32,
}

impl SpotLight {
    /// Unit vector from the light towards its target.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Y)
    }

    /// Cosines of the outer and inner cone edges.
    pub fn cone_cos(&self) -> (f32, f32) {
        let outer = self.angle.cos();
        let inner = (self.angle * (1.0 - self.penumbra)).cos();
        (outer, inner)
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            target: Vec3::new(0.0, 0.3, -5.0),
            color: [1.0, 1.0, 1.0],
            intensity: 100.0,
            distance: 10.0,
            angle: 0.65,
            penumbra: 0.5,
            decay: 2.0,
        }
    }
}

/// Horizontal reflective disc beneath the ring.
#[derive(Debug, Clone)]
pub struct Mirror {
    pub radius: f32,
    /// Height of the plane on the Y axis
    pub height: f32,
    /// Tint blended over the reflection (linear RGB)
    pub color: [f32; 3],
    /// Mesh detail
    pub segments: u32,
    target_size: (u32, u32),
}

impl Mirror {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            radius: 10.0,
            height: -1.15,
            color: hex_to_linear(0x202020),
            segments: 32,
            target_size: (width.max(1), height.max(1)),
        }
    }

    /// Reflection render target size; always matches the viewport.
    pub fn target_size(&self) -> (u32, u32) {
        self.target_size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.target_size = (width.max(1), height.max(1));
    }

    /// Reflects world space across the mirror plane.
    pub fn reflection_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.height, 0.0))
            * Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))
            * Mat4::from_translation(Vec3::new(0.0, -self.height, 0.0))
    }

    /// Model matrix placing the disc mesh (built on the XZ plane) at its height.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.height, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_light_aims_at_ring() {
        let light = SpotLight::default();
        let dir = light.direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.y < 0.0);
        assert!(dir.z < 0.0);
    }

    #[test]
    fn test_cone_cos_ordering() {
        let (outer, inner) = SpotLight::default().cone_cos();
        assert!(inner > outer);
        assert!((outer - 0.65f32.cos()).abs() < 1e-6);
    }

    #[test]
    fn test_reflection_matrix() {
        let mirror = Mirror::new(800, 600);
        let above = Vec3::new(1.0, mirror.height + 2.0, -3.0);
        let reflected = mirror.reflection_matrix().transform_point3(above);
        assert!(reflected.abs_diff_eq(Vec3::new(1.0, mirror.height - 2.0, -3.0), 1e-5));

        let on_plane = Vec3::new(4.0, mirror.height, 2.0);
        assert!(mirror
            .reflection_matrix()
            .transform_point3(on_plane)
            .abs_diff_eq(on_plane, 1e-5));
    }

    #[test]
    fn test_mirror_resize() {
        let mut mirror = Mirror::new(800, 600);
        assert_eq!(mirror.target_size(), (800, 600));
        mirror.resize(1920, 1080);
        assert_eq!(mirror.target_size(), (1920, 1080));
        mirror.resize(0, 0);
        assert_eq!(mirror.target_size(), (1, 1));
    }
}

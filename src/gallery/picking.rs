//! Screen-space picking against ring shapes
//!
//! A click is converted to normalized device coordinates, unprojected into a
//! world-space ray and tested against every shape's oriented box. The nearest
//! hit wins.

use glam::{Mat4, Vec2, Vec3};

use super::scene::{Ring, Shape, ShapeId};

/// Convert a pixel position (origin top-left) to normalized device coordinates.
pub fn screen_to_ndc(position: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        (position.x / width.max(1.0)) * 2.0 - 1.0,
        -(position.y / height.max(1.0)) * 2.0 + 1.0,
    )
}

/// World-space ray with a unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Ray from the camera through an NDC point.
    ///
    /// `inverse_view_proj` is the inverse of the camera's view-projection matrix.
    pub fn from_ndc(ndc: Vec2, inverse_view_proj: Mat4) -> Self {
        // wgpu clip space: depth 0 at the near plane, 1 at the far plane
        let near = inverse_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Self {
            origin: near,
            direction: (far - near).normalize_or(Vec3::NEG_Z),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to an oriented box, if hit in front of the origin.
    ///
    /// `transform` must be rigid (rotation + translation) so that distances in
    /// the box frame equal world distances.
    pub fn intersect_box(&self, transform: Mat4, half_extents: Vec3) -> Option<f32> {
        let inverse = transform.inverse();
        let origin = inverse.transform_point3(self.origin);
        let direction = inverse.transform_vector3(self.direction);

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let h = half_extents[axis];

            if d.abs() < 1e-8 {
                // Parallel to this slab: must already be inside it
                if o < -h || o > h {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (-h - o) * inv;
            let mut t1 = (h - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }
        Some(if t_min >= 0.0 { t_min } else { t_max })
    }
}

/// A shape hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub shape: ShapeId,
    pub distance: f32,
}

/// Nearest shape in the ring hit by `ray`.
pub fn pick_nearest(ring: &Ring, ray: &Ray) -> Option<Hit> {
    let mut best: Option<Hit> = None;

    #[inline]
    fn update_best(best: &mut Option<Hit>, candidate: Hit) {
        let replace = match *best {
            None => true,
            Some(hit) => candidate.distance < hit.distance,
        };
        if replace {
            *best = Some(candidate);
        }
    }

    for shape in ring.shapes() {
        if let Some(distance) = intersect_shape(ring, shape, ray) {
            update_best(
                &mut best,
                Hit {
                    shape: shape.id,
                    distance,
                },
            );
        }
    }
    best
}

fn intersect_shape(ring: &Ring, shape: &Shape, ray: &Ray) -> Option<f32> {
    ray.intersect_box(ring.shape_transform(shape), shape.half_extents())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::gallery::camera::GalleryCamera;
    use crate::gallery::collection::Collection;
    use crate::gallery::scene::ShapeKind;

    fn ring() -> Ring {
        Ring::build(&Collection::builtin().unwrap(), &SceneConfig::default())
    }

    fn ray_to(point: Vec3) -> Ray {
        Ray {
            origin: Vec3::ZERO,
            direction: point.normalize(),
        }
    }

    #[test]
    fn test_screen_to_ndc() {
        assert_eq!(screen_to_ndc(Vec2::new(0.0, 0.0), 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(screen_to_ndc(Vec2::new(800.0, 600.0), 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(screen_to_ndc(Vec2::new(400.0, 300.0), 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn test_ray_from_centre_looks_forward() {
        let camera = GalleryCamera::default();
        let ray = Ray::from_ndc(Vec2::ZERO, camera.view_projection_matrix().inverse());
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-4));
        assert!(ray.origin.z < 0.0 && ray.origin.z > -0.2);
    }

    #[test]
    fn test_intersect_box() {
        let ray = ray_to(Vec3::NEG_Z);
        let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let t = ray.intersect_box(transform, Vec3::splat(0.5)).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        assert!(ray.at(t).abs_diff_eq(Vec3::new(0.0, 0.0, -4.5), 1e-5));

        // Behind the origin
        let behind = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0));
        assert!(ray.intersect_box(behind, Vec3::splat(0.5)).is_none());

        // Off to the side
        let aside = Mat4::from_translation(Vec3::new(3.0, 0.0, -5.0));
        assert!(ray.intersect_box(aside, Vec3::splat(0.5)).is_none());
    }

    #[test]
    fn test_intersect_rotated_box() {
        // Thin plate rotated 90 degrees so it is edge-on to a ray along -Z
        let ray = ray_to(Vec3::NEG_Z);
        let plate = Vec3::new(1.0, 1.0, 0.01);
        let rotated = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0))
            * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let t = ray.intersect_box(rotated, plate).unwrap();
        assert!((t - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_pick_prefers_nearest() {
        let ring = ring();
        let hit = pick_nearest(&ring, &ray_to(Vec3::NEG_Z)).unwrap();
        // The artwork face is thicker than the border, so it is in front
        let shape = ring.shape(hit.shape).unwrap();
        assert_eq!(shape.kind, ShapeKind::Artwork);
        assert_eq!(shape.panel, 0);
        assert!((hit.distance - 3.95).abs() < 1e-4);
    }

    #[test]
    fn test_pick_hotspot() {
        let ring = ring();
        let hit = pick_nearest(&ring, &ray_to(Vec3::new(-1.8, 0.0, -4.0))).unwrap();
        assert_eq!(hit.shape, ring.panels()[0].next);

        let hit = pick_nearest(&ring, &ray_to(Vec3::new(1.8, 0.0, -4.0))).unwrap();
        assert_eq!(hit.shape, ring.panels()[0].previous);
    }

    #[test]
    fn test_pick_miss() {
        let ring = ring();
        assert!(pick_nearest(&ring, &ray_to(Vec3::Y)).is_none());
        assert!(pick_nearest(&ring, &ray_to(Vec3::new(0.0, 3.0, -4.0))).is_none());
    }
}

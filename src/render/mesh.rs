//! Mesh generation for ring shapes and the mirror disc.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::TAU;

/// Vertex for gallery meshes
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GalleryVertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Normal vector (for lighting)
    pub normal: [f32; 3],
    /// Texture coordinates
    pub uv: [f32; 2],
}

impl GalleryVertex {
    /// Size of vertex in bytes
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Vertex buffer layout for wgpu
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // normal
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // uv
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Generated mesh data
pub struct GalleryMesh {
    pub vertices: Vec<GalleryVertex>,
    pub indices: Vec<u32>,
}

impl GalleryMesh {
    /// Unit cube centred on the origin, scaled per shape by its model matrix.
    ///
    /// Every face maps the whole texture, upright when viewed from outside.
    pub fn unit_box() -> Self {
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        // (normal, up) per face; right = up x normal
        let faces = [
            (Vec3::Z, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y),
            (Vec3::X, Vec3::Y),
            (Vec3::NEG_X, Vec3::Y),
            (Vec3::Y, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::Z),
        ];

        for (normal, up) in faces {
            let right = up.cross(normal);
            let centre = normal * 0.5;
            let base = vertices.len() as u32;

            for (sx, sy, uv) in [
                (-1.0, -1.0, [0.0, 1.0]),
                (1.0, -1.0, [1.0, 1.0]),
                (1.0, 1.0, [1.0, 0.0]),
                (-1.0, 1.0, [0.0, 0.0]),
            ] {
                let position = centre + right * (sx * 0.5) + up * (sy * 0.5);
                vertices.push(GalleryVertex {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    uv,
                });
            }

            // CCW winding seen from outside
            indices.extend_from_slice(&[base, base + 1, base + 2]);
            indices.extend_from_slice(&[base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Flat disc on the XZ plane facing +Y.
    pub fn circle(radius: f32, segments: u32) -> Self {
        let segments = segments.max(8);
        let mut vertices = Vec::with_capacity(segments as usize + 1);
        let mut indices = Vec::with_capacity(segments as usize * 3);

        // Center vertex
        vertices.push(GalleryVertex {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.5, 0.5],
        });

        // Edge vertices
        for i in 0..segments {
            let angle = (i as f32 / segments as f32) * TAU;
            let x = angle.cos() * radius;
            let z = angle.sin() * radius;

            vertices.push(GalleryVertex {
                position: [x, 0.0, z],
                normal: [0.0, 1.0, 0.0],
                uv: [(angle.cos() + 1.0) * 0.5, (angle.sin() + 1.0) * 0.5],
            });
        }

        // Triangle fan indices (CCW viewed from above)
        for i in 0..segments {
            indices.push(0);
            indices.push(((i + 1) % segments) + 1);
            indices.push(i + 1);
        }

        Self { vertices, indices }
    }

    /// Get index count
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_box_mesh() {
        let mesh = GalleryMesh::unit_box();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.index_count(), 36);
        for v in &mesh.vertices {
            for c in v.position {
                assert!((c.abs() - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_unit_box_winding_faces_out() {
        let mesh = GalleryMesh::unit_box();
        for tri in mesh.indices.chunks(3) {
            let a = Vec3::from_array(mesh.vertices[tri[0] as usize].position);
            let b = Vec3::from_array(mesh.vertices[tri[1] as usize].position);
            let c = Vec3::from_array(mesh.vertices[tri[2] as usize].position);
            let normal = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_front_face_texture_upright() {
        let mesh = GalleryMesh::unit_box();
        // First face is +Z; its top-left corner samples the top-left of the image
        let top_left = mesh.vertices[3];
        assert_eq!(top_left.position, [-0.5, 0.5, 0.5]);
        assert_eq!(top_left.uv, [0.0, 0.0]);
    }

    #[test]
    fn test_circle_mesh() {
        let mesh = GalleryMesh::circle(10.0, 16);
        assert_eq!(mesh.vertices.len(), 17); // Center + 16 edge vertices
        assert_eq!(mesh.indices.len(), 48); // 16 triangles * 3
    }

    #[test]
    fn test_circle_faces_up() {
        let mesh = GalleryMesh::circle(1.0, 8);
        for tri in mesh.indices.chunks(3) {
            let a = Vec3::from_array(mesh.vertices[tri[0] as usize].position);
            let b = Vec3::from_array(mesh.vertices[tri[1] as usize].position);
            let c = Vec3::from_array(mesh.vertices[tri[2] as usize].position);
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }
}

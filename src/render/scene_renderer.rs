//! Ring, spot light and mirror floor rendering
//!
//! Each frame runs two passes: the ring is first drawn from the camera
//! reflected in the mirror plane into an offscreen target, then the ring and
//! the mirror disc (sampling that target) are drawn to the surface.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::mesh::{GalleryMesh, GalleryVertex};
use super::pipeline::{create_depth_view, DEPTH_FORMAT};
use super::texture::{ColorEncoding, DecodedImage, GpuTexture, TextureSlot};
use crate::gallery::{GalleryState, HotspotRole, Shape, ShapeKind};

/// Per-frame camera and light uniforms
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    light_position: [f32; 4],
    light_direction: [f32; 4],
    light_color: [f32; 4],
    light_cone: [f32; 4],
}

/// Per-shape uniforms, one aligned slot per shape
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ShapeUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct MirrorUniforms {
    model: [[f32; 4]; 4],
    texture_matrix: [[f32; 4]; 4],
    color: [f32; 4],
}

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

fn align_to(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

/// Texture a shape samples.
pub fn texture_slot(shape: &Shape) -> TextureSlot {
    match shape.kind {
        ShapeKind::Border => TextureSlot::White,
        ShapeKind::Artwork => TextureSlot::Artwork(shape.panel),
        ShapeKind::Hotspot(HotspotRole::Previous) => TextureSlot::PreviousIcon,
        ShapeKind::Hotspot(HotspotRole::Next) => TextureSlot::NextIcon,
    }
}

/// Shape indices in draw order: opaque shapes first, then the alpha-tested hotspots.
pub fn draw_order(shapes: &[Shape]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..shapes.len()).collect();
    order.sort_by_key(|&i| shapes[i].material.transparent);
    order
}

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, mesh: &GalleryMesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
        }
    }
}

/// Offscreen colour + depth target for the reflected view.
struct ReflectionTarget {
    view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

impl ReflectionTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        (width, height): (u32, u32),
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Mirror Reflection Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = create_depth_view(device, width, height, "Mirror Depth Texture");
        let bind_group = GpuTexture::bind(device, layout, &view, sampler, "Mirror Reflection Bind Group");

        Self {
            view,
            depth_view,
            bind_group,
            size: (width, height),
        }
    }
}

/// GPU renderer for the gallery scene
pub struct SceneRenderer {
    scene_pipeline: wgpu::RenderPipeline,
    mirror_pipeline: wgpu::RenderPipeline,

    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    surface_format: wgpu::TextureFormat,

    // Frame uniforms for the main and reflected cameras
    main_frame_buffer: wgpu::Buffer,
    main_frame_bind_group: wgpu::BindGroup,
    reflected_frame_buffer: wgpu::Buffer,
    reflected_frame_bind_group: wgpu::BindGroup,

    shape_buffer: wgpu::Buffer,
    shape_bind_group: wgpu::BindGroup,
    shape_stride: u64,
    shape_capacity: usize,

    mirror_buffer: wgpu::Buffer,
    mirror_bind_group: wgpu::BindGroup,

    cube: MeshBuffers,
    disc: MeshBuffers,

    white: GpuTexture,
    textures: HashMap<TextureSlot, GpuTexture>,
    reflection: ReflectionTarget,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        state: &GalleryState,
    ) -> Self {
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Gallery Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });
        let mirror_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Gallery Mirror Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mirror.wgsl").into()),
        });

        let frame_size = std::mem::size_of::<FrameUniforms>() as u64;
        let shape_size = std::mem::size_of::<ShapeUniforms>() as u64;
        let mirror_size = std::mem::size_of::<MirrorUniforms>() as u64;

        let uniform_entry = |dynamic: bool, size: u64| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: wgpu::BufferSize::new(size),
            },
            count: None,
        };

        // Group 0: frame uniforms
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[uniform_entry(false, frame_size)],
        });
        // Group 1: shape uniforms at a dynamic offset
        let shape_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shape Bind Group Layout"),
            entries: &[uniform_entry(true, shape_size)],
        });
        let mirror_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mirror Bind Group Layout"),
            entries: &[uniform_entry(false, mirror_size)],
        });
        // Group 2: texture + sampler
        let texture_layout = GpuTexture::bind_group_layout(device, "Gallery Texture Bind Group Layout");

        let scene_pipeline = Self::create_pipeline(
            device,
            "Gallery Scene Pipeline",
            &scene_shader,
            &[&frame_layout, &shape_layout, &texture_layout],
            surface_format,
            wgpu::BlendState::ALPHA_BLENDING,
        );
        let mirror_pipeline = Self::create_pipeline(
            device,
            "Gallery Mirror Pipeline",
            &mirror_shader,
            &[&frame_layout, &mirror_layout, &texture_layout],
            surface_format,
            wgpu::BlendState::REPLACE,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Gallery Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let create_frame = |label: &str| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: frame_size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &frame_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            (buffer, bind_group)
        };
        let (main_frame_buffer, main_frame_bind_group) = create_frame("Main Frame Uniforms");
        let (reflected_frame_buffer, reflected_frame_bind_group) = create_frame("Reflected Frame Uniforms");

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let shape_stride = align_to(shape_size, alignment);
        let shape_capacity = state.ring.shapes().len().max(1);
        let shape_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shape Uniform Buffer"),
            size: shape_stride * shape_capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let shape_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shape Bind Group"),
            layout: &shape_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &shape_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(shape_size),
                }),
            }],
        });

        let mirror_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mirror Uniform Buffer"),
            size: mirror_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let mirror_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mirror Bind Group"),
            layout: &mirror_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: mirror_buffer.as_entire_binding(),
            }],
        });

        let cube = MeshBuffers::new(device, &GalleryMesh::unit_box(), "Shape Cube");
        let disc = MeshBuffers::new(
            device,
            &GalleryMesh::circle(state.mirror.radius, state.mirror.segments),
            "Mirror Disc",
        );

        let white = GpuTexture::from_image(
            device,
            queue,
            &texture_layout,
            &sampler,
            &DecodedImage::white(),
            ColorEncoding::Srgb,
            "White Placeholder Texture",
        );

        let reflection = ReflectionTarget::new(
            device,
            surface_format,
            &texture_layout,
            &sampler,
            state.mirror.target_size(),
        );

        log::info!(
            "Scene renderer ready ({} shapes, uniform stride {} bytes)",
            state.ring.shapes().len(),
            shape_stride
        );

        Self {
            scene_pipeline,
            mirror_pipeline,
            texture_layout,
            sampler,
            surface_format,
            main_frame_buffer,
            main_frame_bind_group,
            reflected_frame_buffer,
            reflected_frame_bind_group,
            shape_buffer,
            shape_bind_group,
            shape_stride,
            shape_capacity,
            mirror_buffer,
            mirror_bind_group,
            cube,
            disc,
            white,
            textures: HashMap::new(),
            reflection,
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        label: &str,
        shader: &wgpu::ShaderModule,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        format: wgpu::TextureFormat,
        blend: wgpu::BlendState,
    ) -> wgpu::RenderPipeline {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[GalleryVertex::buffer_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The reflected view flips winding, so draw both sides
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Recreate the reflection target after the viewport changed.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let size = (width.max(1), height.max(1));
        if self.reflection.size == size {
            return;
        }
        self.reflection = ReflectionTarget::new(
            device,
            self.surface_format,
            &self.texture_layout,
            &self.sampler,
            size,
        );
        log::debug!("Reflection target resized to {}x{}", size.0, size.1);
    }

    /// Upload a decoded image, replacing the placeholder for `slot`.
    pub fn set_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: TextureSlot,
        image: &DecodedImage,
    ) {
        let texture = GpuTexture::from_image(
            device,
            queue,
            &self.texture_layout,
            &self.sampler,
            image,
            slot.encoding(),
            &format!("{:?} Texture", slot),
        );
        self.textures.insert(slot, texture);
    }

    fn bind_group_for(&self, slot: TextureSlot) -> &wgpu::BindGroup {
        self.textures
            .get(&slot)
            .map(|texture| &texture.bind_group)
            .unwrap_or(&self.white.bind_group)
    }

    fn frame_uniforms(state: &GalleryState, view_proj: Mat4) -> FrameUniforms {
        let light = &state.light;
        let direction = light.direction();
        let (outer, inner) = light.cone_cos();
        FrameUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            light_position: light.position.extend(light.intensity).to_array(),
            light_direction: direction.extend(light.distance).to_array(),
            light_color: [light.color[0], light.color[1], light.color[2], light.decay],
            light_cone: [outer, inner, 0.0, 0.0],
        }
    }

    fn write_uniforms(&self, queue: &wgpu::Queue, state: &GalleryState) {
        let view_proj = state.camera.view_projection_matrix();
        let reflected = view_proj * state.mirror.reflection_matrix();

        queue.write_buffer(
            &self.main_frame_buffer,
            0,
            bytemuck::bytes_of(&Self::frame_uniforms(state, view_proj)),
        );
        queue.write_buffer(
            &self.reflected_frame_buffer,
            0,
            bytemuck::bytes_of(&Self::frame_uniforms(state, reflected)),
        );

        let stride = self.shape_stride as usize;
        let mut shape_data = vec![0u8; stride * self.shape_capacity];
        for (i, shape) in state.ring.shapes().iter().take(self.shape_capacity).enumerate() {
            let model = state.ring.shape_transform(shape) * Mat4::from_scale(shape.size);
            let material = &shape.material;
            let uniforms = ShapeUniforms {
                model: model.to_cols_array_2d(),
                color: [material.color[0], material.color[1], material.color[2], 1.0],
                emissive: [
                    material.emissive[0],
                    material.emissive[1],
                    material.emissive[2],
                    if material.transparent { 1.0 } else { 0.0 },
                ],
            };
            let bytes = bytemuck::bytes_of(&uniforms);
            shape_data[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        queue.write_buffer(&self.shape_buffer, 0, &shape_data);

        let mirror = &state.mirror;
        let mirror_uniforms = MirrorUniforms {
            model: mirror.transform().to_cols_array_2d(),
            texture_matrix: reflected.to_cols_array_2d(),
            color: [mirror.color[0], mirror.color[1], mirror.color[2], 1.0],
        };
        queue.write_buffer(&self.mirror_buffer, 0, bytemuck::bytes_of(&mirror_uniforms));
    }

    fn draw_ring(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        state: &GalleryState,
        frame_bind_group: &wgpu::BindGroup,
    ) {
        let shapes = state.ring.shapes();
        pass.set_pipeline(&self.scene_pipeline);
        pass.set_bind_group(0, frame_bind_group, &[]);
        pass.set_vertex_buffer(0, self.cube.vertex_buffer.slice(..));
        pass.set_index_buffer(self.cube.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for i in draw_order(shapes) {
            if i >= self.shape_capacity {
                continue;
            }
            let offset = (i as u64 * self.shape_stride) as wgpu::DynamicOffset;
            pass.set_bind_group(1, &self.shape_bind_group, &[offset]);
            pass.set_bind_group(2, self.bind_group_for(texture_slot(&shapes[i])), &[]);
            pass.draw_indexed(0..self.cube.index_count, 0, 0..1);
        }
    }

    /// Record the reflection and main passes into `encoder`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        state: &GalleryState,
    ) {
        self.write_uniforms(queue, state);

        // Reflected view of the ring
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mirror Reflection Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.reflection.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.reflection.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.draw_ring(&mut pass, state, &self.reflected_frame_bind_group);
        }

        // Main view: ring, then the mirror floor
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Gallery Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.draw_ring(&mut pass, state, &self.main_frame_bind_group);

            pass.set_pipeline(&self.mirror_pipeline);
            pass.set_bind_group(0, &self.main_frame_bind_group, &[]);
            pass.set_bind_group(1, &self.mirror_bind_group, &[]);
            pass.set_bind_group(2, &self.reflection.bind_group, &[]);
            pass.set_vertex_buffer(0, self.disc.vertex_buffer.slice(..));
            pass.set_index_buffer(self.disc.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.disc.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::Collection;

    fn state() -> GalleryState {
        GalleryState::new(Collection::builtin().unwrap(), 1280, 720)
    }

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 128);
        assert_eq!(std::mem::size_of::<ShapeUniforms>(), 96);
        assert_eq!(std::mem::size_of::<MirrorUniforms>(), 144);
    }

    #[test]
    fn test_align_to() {
        assert_eq!(align_to(96, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
    }

    #[test]
    fn test_texture_slots() {
        let state = state();
        let panel = &state.ring.panels()[2];
        let slot = |id| texture_slot(state.ring.shape(id).unwrap());
        assert_eq!(slot(panel.border), TextureSlot::White);
        assert_eq!(slot(panel.artwork), TextureSlot::Artwork(2));
        assert_eq!(slot(panel.previous), TextureSlot::PreviousIcon);
        assert_eq!(slot(panel.next), TextureSlot::NextIcon);
    }

    #[test]
    fn test_hotspots_drawn_last() {
        let state = state();
        let shapes = state.ring.shapes();
        let order = draw_order(shapes);
        assert_eq!(order.len(), shapes.len());

        let first_hotspot = order
            .iter()
            .position(|&i| matches!(shapes[i].kind, ShapeKind::Hotspot(_)))
            .unwrap();
        assert_eq!(first_hotspot, shapes.len() - 2 * state.ring.panel_count());
        assert!(order[first_hotspot..]
            .iter()
            .all(|&i| matches!(shapes[i].kind, ShapeKind::Hotspot(_))));
    }

    #[test]
    fn test_reflected_frame_flips_height() {
        let state = state();
        let view_proj = state.camera.view_projection_matrix();
        let reflected = view_proj * state.mirror.reflection_matrix();
        // A point on the mirror plane projects identically in both views
        let on_plane = glam::Vec3::new(0.5, state.mirror.height, -3.0);
        assert!(view_proj
            .project_point3(on_plane)
            .abs_diff_eq(reflected.project_point3(on_plane), 1e-5));
    }
}

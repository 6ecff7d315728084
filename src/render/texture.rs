//! Image decoding and GPU texture upload
//!
//! Images are decoded on background threads and handed back over a channel;
//! the render loop polls once per frame and uploads whatever has finished.
//! Until then a shape is drawn with a 1x1 white placeholder.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::error::{GalleryError, Result};

/// Largest texture edge uploaded; bigger images are downscaled.
pub const MAX_TEXTURE_DIMENSION: u32 = 2048;

/// How texel values should be interpreted when sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorEncoding {
    /// Display-referred (photographs, paintings)
    Srgb,
    /// Raw values
    Linear,
}

impl ColorEncoding {
    pub fn texture_format(&self) -> wgpu::TextureFormat {
        match self {
            ColorEncoding::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            ColorEncoding::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Which texture a shape samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Untextured shapes
    White,
    Artwork(usize),
    PreviousIcon,
    NextIcon,
}

impl TextureSlot {
    pub fn encoding(&self) -> ColorEncoding {
        match self {
            TextureSlot::Artwork(_) | TextureSlot::White => ColorEncoding::Srgb,
            TextureSlot::PreviousIcon | TextureSlot::NextIcon => ColorEncoding::Linear,
        }
    }
}

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Single opaque white texel.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255, 255, 255, 255],
        }
    }
}

/// Decode an image file to RGBA8, downscaling if either edge exceeds
/// [`MAX_TEXTURE_DIMENSION`].
pub fn decode_image(path: &Path) -> Result<DecodedImage> {
    let bytes = std::fs::read(path)?;
    let img = image::load_from_memory(&bytes)
        .map_err(|source| GalleryError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = img.dimensions();

    let (width, height, pixels) = if width > MAX_TEXTURE_DIMENSION || height > MAX_TEXTURE_DIMENSION {
        let scale = MAX_TEXTURE_DIMENSION as f32 / width.max(height) as f32;
        let new_width = ((width as f32 * scale) as u32).max(1);
        let new_height = ((height as f32 * scale) as u32).max(1);
        let resized = image::imageops::resize(
            &img,
            new_width,
            new_height,
            image::imageops::FilterType::Triangle,
        );
        (new_width, new_height, resized.into_raw())
    } else {
        (width, height, img.into_raw())
    };

    Ok(DecodedImage {
        width,
        height,
        pixels,
    })
}

/// Result of a background decode.
pub struct LoadedImage {
    pub slot: TextureSlot,
    pub path: PathBuf,
    pub image: Result<DecodedImage>,
}

/// Fire-and-forget image decoder.
pub struct ImageLoader {
    sender: Sender<LoadedImage>,
    receiver: Receiver<LoadedImage>,
    pending: usize,
}

impl ImageLoader {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Start decoding `path` on a background thread.
    pub fn request(&mut self, slot: TextureSlot, path: PathBuf) {
        let sender = self.sender.clone();
        self.pending += 1;
        thread::spawn(move || {
            let image = decode_image(&path);
            let _ = sender.send(LoadedImage { slot, path, image });
        });
    }

    /// Collect every decode that has finished (non-blocking).
    pub fn poll(&mut self) -> Vec<LoadedImage> {
        let finished: Vec<LoadedImage> = self.receiver.try_iter().collect();
        self.pending = self.pending.saturating_sub(finished.len());
        finished
    }

    /// Number of requests not yet collected.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// A sampled texture and the bind group exposing it.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    /// Bind group layout: [0] texture, [1] sampler
    pub fn bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    /// Upload decoded pixels.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &DecodedImage,
        encoding: ColorEncoding,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: encoding.texture_format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = Self::bind(device, layout, &view, sampler, label);

        Self {
            texture,
            view,
            bind_group,
        }
    }

    /// Bind an existing view (e.g. a render target) for sampling.
    pub fn bind(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }
}

//! GPU rendering: surface, meshes, textures and the gallery scene.

pub mod mesh;
pub mod pipeline;
pub mod scene_renderer;
pub mod texture;

pub use mesh::{GalleryMesh, GalleryVertex};
pub use pipeline::RenderPipeline;
pub use scene_renderer::SceneRenderer;
pub use texture::{decode_image, DecodedImage, ImageLoader, LoadedImage, TextureSlot};

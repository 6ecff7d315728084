//! Compiled-in viewer configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Window title.
pub const WINDOW_TITLE: &str = "Gallery";

/// Initial window size in logical pixels.
pub const WINDOW_WIDTH: f64 = 1280.0;
pub const WINDOW_HEIGHT: f64 = 720.0;

/// Time taken to rotate the ring by one panel.
pub const ROTATION_DURATION: Duration = Duration::from_millis(1000);

/// Environment variable overriding the asset directory.
pub const ASSET_DIR_ENV: &str = "GALLERY_ASSET_DIR";

/// The built-in collection document.
pub const COLLECTION_JSON: &str = include_str!("../../assets/collection.json");

/// Directory images are loaded from.
///
/// Defaults to `assets/` next to the crate manifest.
pub fn asset_dir() -> PathBuf {
    std::env::var_os(ASSET_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))
}

/// Surface colour and lighting response of a ring shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base colour (linear RGB) multiplied with the texture.
    pub color: [f32; 3],
    /// Self-illumination added after lighting.
    pub emissive: [f32; 3],
    /// Whether the texture alpha is respected.
    pub transparent: bool,
}

impl Material {
    pub const fn opaque(color: [f32; 3]) -> Self {
        Self {
            color,
            emissive: [0.0, 0.0, 0.0],
            transparent: false,
        }
    }
}

/// Convert a 0xRRGGBB sRGB hex colour to linear RGB.
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}

/// Layout of the artwork ring.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Distance from the vertical axis to each panel.
    pub radius: f32,
    /// Border box size (width, height, depth).
    pub border_size: [f32; 3],
    /// Artwork face box size.
    pub artwork_size: [f32; 3],
    /// Navigation hotspot box size.
    pub hotspot_size: [f32; 3],
    /// Horizontal distance of each hotspot from the panel centre.
    pub hotspot_offset: f32,
    pub border_material: Material,
    pub artwork_material: Material,
    pub hotspot_material: Material,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            border_size: [3.2, 2.2, 0.09],
            artwork_size: [3.0, 2.0, 0.1],
            hotspot_size: [0.3, 0.3, 0.01],
            hotspot_offset: 1.8,
            border_material: Material::opaque(hex_to_linear(0x202020)),
            artwork_material: Material::opaque([1.0, 1.0, 1.0]),
            hotspot_material: Material {
                color: [1.0, 1.0, 1.0],
                emissive: [1.0, 1.0, 1.0],
                transparent: true,
            },
        }
    }
}

/// Perspective camera parameters.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_linear_extremes() {
        assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let white = hex_to_linear(0xffffff);
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_hex_to_linear_dark_grey() {
        let grey = hex_to_linear(0x202020);
        assert!(grey[0] > 0.01 && grey[0] < 0.02);
        assert_eq!(grey[0], grey[1]);
        assert_eq!(grey[1], grey[2]);
    }

    #[test]
    fn test_scene_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.radius, 4.0);
        assert!(config.hotspot_material.transparent);
        assert!(!config.border_material.transparent);
        // Hotspots sit just outside the border
        assert!(config.hotspot_offset - config.hotspot_size[0] / 2.0 > config.border_size[0] / 2.0);
    }

    #[test]
    fn test_collection_is_embedded() {
        assert!(COLLECTION_JSON.contains("The Death of Socrates"));
    }
}

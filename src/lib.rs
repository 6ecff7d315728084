//! Gallery Ring
//!
//! A 3D art gallery viewer: framed artworks stand on a ring around the
//! camera, arrow hotspots rotate the ring one panel at a time, a spot light
//! and a mirror floor dress the scene, and the front artwork's title and
//! artist are shown underneath.

pub mod app;
pub mod config;
pub mod error;
pub mod gallery;
pub mod render;
pub mod ui;

pub use error::{GalleryError, Result};

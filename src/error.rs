//! Error types for the gallery viewer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while assembling or loading the gallery.
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Gallery collection has no artworks")]
    EmptyCollection,
    #[error(
        "Gallery collection lists differ in length: {images} images, {titles} titles, {artists} artists"
    )]
    MismatchedCollection {
        images: usize,
        titles: usize,
        artists: usize,
    },
    #[error("Failed to parse gallery collection: {0}")]
    CollectionParse(#[from] serde_json::Error),
    #[error("Failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GalleryError>;

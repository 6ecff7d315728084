//! The ordered list of artworks shown on the ring.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};

/// One artwork: its image file plus caption text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkEntry {
    /// Image file, relative to the asset directory
    pub image: PathBuf,
    pub title: String,
    pub artist: String,
}

/// Serialized form of a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionDocument {
    artworks: Vec<ArtworkEntry>,
    previous_icon: PathBuf,
    next_icon: PathBuf,
}

/// Non-empty, fixed-order artwork collection plus the two hotspot icons.
#[derive(Debug, Clone)]
pub struct Collection {
    entries: Vec<ArtworkEntry>,
    previous_icon: PathBuf,
    next_icon: PathBuf,
}

impl Collection {
    /// Build a collection from parallel image/title/artist lists.
    ///
    /// Index `i` of each list describes the same artwork, so all three must
    /// have the same length.
    pub fn from_parallel<I, T, A>(
        images: &[I],
        titles: &[T],
        artists: &[A],
        previous_icon: impl Into<PathBuf>,
        next_icon: impl Into<PathBuf>,
    ) -> Result<Self>
    where
        I: AsRef<Path>,
        T: AsRef<str>,
        A: AsRef<str>,
    {
        if images.len() != titles.len() || images.len() != artists.len() {
            return Err(GalleryError::MismatchedCollection {
                images: images.len(),
                titles: titles.len(),
                artists: artists.len(),
            });
        }

        let entries = images
            .iter()
            .zip(titles)
            .zip(artists)
            .map(|((image, title), artist)| ArtworkEntry {
                image: image.as_ref().to_path_buf(),
                title: title.as_ref().to_string(),
                artist: artist.as_ref().to_string(),
            })
            .collect();

        Self::new(entries, previous_icon.into(), next_icon.into())
    }

    /// Parse a collection from its JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: CollectionDocument = serde_json::from_str(json)?;
        Self::new(doc.artworks, doc.previous_icon, doc.next_icon)
    }

    /// The collection compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(crate::config::COLLECTION_JSON)
    }

    fn new(entries: Vec<ArtworkEntry>, previous_icon: PathBuf, next_icon: PathBuf) -> Result<Self> {
        if entries.is_empty() {
            return Err(GalleryError::EmptyCollection);
        }
        Ok(Self {
            entries,
            previous_icon,
            next_icon,
        })
    }

    /// Number of artworks (N).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArtworkEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[ArtworkEntry] {
        &self.entries
    }

    pub fn previous_icon(&self) -> &Path {
        &self.previous_icon
    }

    pub fn next_icon(&self) -> &Path {
        &self.next_icon
    }
}

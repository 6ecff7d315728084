//! Caption text shown under the ring.

use super::collection::ArtworkEntry;

/// Currently shown title/artist pair and whether it is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub title: String,
    pub artist: String,
    pub visible: bool,
}

impl DisplayState {
    /// Visible caption for an entry.
    pub fn showing(entry: &ArtworkEntry) -> Self {
        Self {
            title: entry.title.clone(),
            artist: entry.artist.clone(),
            visible: true,
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Replace the text with `entry` and make it visible again.
    pub fn commit(&mut self, entry: &ArtworkEntry) {
        self.title.clone_from(&entry.title);
        self.artist.clone_from(&entry.artist);
        self.visible = true;
    }
}

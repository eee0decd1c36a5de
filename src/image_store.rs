use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// An inline image anchored to a grid cell (spec.md §3 "Image Store").
///
/// `data` is the original (still-encoded) image bytes, verbatim — this
/// crate only decodes far enough to validate the payload (spec.md §4.4);
/// turning pixels into an on-screen blit is the renderer's job, out of
/// scope here (spec.md §1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredImage {
    pub data: Vec<u8>,
    pub id: u64,
    pub width_constraint: String,
    pub height_constraint: String,
    pub preserve_aspect: bool,
}

/// Mapping from grid position to stored image, keyed on the cursor
/// position at the time the OSC 1337 `File=` terminator was processed.
/// No eviction policy in v1 (spec.md §3 "Lifecycles", §9 open question).
pub struct ImageStore {
    images: HashMap<(u16, u16), StoredImage>,
    next_id: u64,
}

impl ImageStore {
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            next_id: 1,
        }
    }

    /// Decode-validate and insert an image at `(r, c)`, overwriting any
    /// prior entry at that key. Returns the assigned id, or `None` if the
    /// payload failed to decode (spec.md §4.4 "Decode failure -> drop").
    pub fn insert(
        &mut self,
        r: u16,
        c: u16,
        base64_data: &str,
        width_constraint: String,
        height_constraint: String,
        preserve_aspect: bool,
    ) -> Option<u64> {
        let data = match BASE64_STANDARD.decode(base64_data) {
            Ok(d) => d,
            Err(err) => {
                tracing::debug!(?err, "OSC 1337 File= payload: base64 decode failed, dropping");
                return None;
            }
        };

        if let Err(err) = image::load_from_memory(&data) {
            tracing::debug!(?err, "OSC 1337 File= payload: image decode failed, dropping");
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.images.insert(
            (r, c),
            StoredImage {
                data,
                id,
                width_constraint,
                height_constraint,
                preserve_aspect,
            },
        );
        Some(id)
    }

    pub fn get(&self, r: u16, c: u16) -> Option<&StoredImage> {
        self.images.get(&(r, c))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A minimal valid 1x1 RGB PNG, base64-encoded.
    const MINIMAL_PNG_B64: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR4nGP4z8AAAAMBAQDJ/pLvAAAAAElFTkSuQmCC";

    #[test]
    fn insert_assigns_monotonic_positive_ids() {
        let mut store = ImageStore::new();
        let id1 = store
            .insert(4, 3, MINIMAL_PNG_B64, "100px".into(), "auto".into(), true)
            .expect("valid png decodes");
        let id2 = store
            .insert(5, 3, MINIMAL_PNG_B64, "auto".into(), "auto".into(), true)
            .expect("valid png decodes");
        assert!(id1 > 0 && id2 > id1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn insert_overwrites_prior_entry_at_same_key() {
        let mut store = ImageStore::new();
        store.insert(1, 1, MINIMAL_PNG_B64, "50px".into(), "auto".into(), false);
        store.insert(1, 1, MINIMAL_PNG_B64, "80%".into(), "auto".into(), false);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1, 1).unwrap().width_constraint, "80%");
    }

    #[test]
    fn garbage_base64_is_dropped_without_inserting() {
        let mut store = ImageStore::new();
        let id = store.insert(0, 0, "not valid base64!!", "auto".into(), "auto".into(), true);
        assert!(id.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn valid_base64_but_undecodable_image_is_dropped() {
        let mut store = ImageStore::new();
        let garbage = BASE64_STANDARD.encode(b"not an image at all");
        let id = store.insert(0, 0, &garbage, "auto".into(), "auto".into(), true);
        assert!(id.is_none());
        assert!(store.is_empty());
    }

    /// A stored image is serde round-trippable (e.g. for a frontend's own
    /// IPC frame, the way the teacher's `RenderFramePayload` carries its
    /// grid/cursor types across the Tauri bridge as JSON).
    #[test]
    fn stored_image_round_trips_through_json() {
        let mut store = ImageStore::new();
        store.insert(2, 1, MINIMAL_PNG_B64, "100px".into(), "auto".into(), true);
        let original = store.get(2, 1).unwrap().clone();

        let json = serde_json::to_string(&original).expect("serialize");
        let restored: StoredImage = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(original, restored);
    }

    /// `Cell` (and its nested `Color`/`AttrFlags`) round-trips the same way.
    #[test]
    fn cell_round_trips_through_json() {
        use crate::attrs::AttrFlags;
        use crate::cell::Cell;
        use crate::color::Color;

        let cell = Cell::with_attrs('x', 2, Color::truecolor(10, 20, 30), Color::Palette256(200), AttrFlags::BOLD | AttrFlags::REVERSE);

        let json = serde_json::to_string(&cell).expect("serialize");
        let restored: Cell = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(cell, restored);
    }
}

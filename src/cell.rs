use serde::{Deserialize, Serialize};

use crate::attrs::AttrFlags;
use crate::color::Color;

/// One grid position (spec.md §3 "Cell").
///
/// `width` is 0 for the continuation half of a wide glyph, 2 for the
/// anchoring left half, 1 otherwise (invariant I3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub ch: char,
    pub width: u8,
    pub fg: Color,
    pub bg: Color,
    pub flags: AttrFlags,
    pub is_image_anchor: bool,
}

impl Default for Cell {
    /// "Default blank": a space, width 1, default colors, no attributes, not
    /// an image anchor (spec.md §3 Grid construction / erasure semantics).
    fn default() -> Self {
        Self {
            ch: ' ',
            width: 1,
            fg: Color::DEFAULT_FG,
            bg: Color::DEFAULT_BG,
            flags: AttrFlags::empty(),
            is_image_anchor: false,
        }
    }
}

impl Cell {
    /// Build a cell for the Writer: current scalar, width, and active
    /// attributes (spec.md §4.2). Never an image anchor — anchors are set
    /// explicitly by the OSC Dispatcher (spec.md §4.4).
    pub fn with_attrs(ch: char, width: u8, fg: Color, bg: Color, flags: AttrFlags) -> Self {
        Self {
            ch,
            width,
            fg,
            bg,
            flags,
            is_image_anchor: false,
        }
    }

    /// A continuation cell trailing a wide glyph: blank, width 0, default
    /// fg, and the given bg inherited from the writer's active attributes
    /// (spec.md §4.2 rule for the right-neighbor cell).
    pub fn continuation(bg: Color) -> Self {
        Self {
            ch: ' ',
            width: 0,
            fg: Color::DEFAULT_FG,
            bg,
            flags: AttrFlags::empty(),
            is_image_anchor: false,
        }
    }
}

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::color::Color;

bitflags! {
    /// Boolean cell attributes toggled by SGR (spec.md §3, §4.3).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
    pub struct AttrFlags: u8 {
        const BOLD      = 1 << 0;
        const UNDERLINE = 1 << 1;
        const REVERSE   = 1 << 2;
    }
}

/// The currently-active graphic rendition: the set SGR mutates and the
/// Character Writer stamps onto every cell it emits (spec.md §3 "Attributes
/// State"). Reset to defaults on SGR 0 or `Terminal` construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub fg: Color,
    pub bg: Color,
    pub flags: AttrFlags,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            fg: Color::DEFAULT_FG,
            bg: Color::DEFAULT_BG,
            flags: AttrFlags::empty(),
        }
    }
}

impl Attributes {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

use serde::{Deserialize, Serialize};

/// A cell's foreground or background color.
///
/// The source this crate replaces carried color as a plain integer plus a
/// parallel "kind" string; that conflates "ECMA-48 SGR code", "256-palette
/// index", and "packed 24-bit RGB" into a single representation a caller has
/// to interpret correctly out-of-band. This tags the variant instead, so a
/// mismatched interpretation is a compile error rather than a runtime bug.
///
/// RGB resolution of `Standard16`/`Palette256` is explicitly the renderer's
/// job (spec.md §6) — this crate never looks up an actual color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code")]
pub enum Color {
    /// ECMA-48 SGR code: 30-37/40-47 for explicit colors, 39/49 for default.
    Standard16(u8),
    /// xterm 256-color palette index (0-255).
    Palette256(u8),
    /// Packed 24-bit RGB, `(r << 16) | (g << 8) | b`.
    Truecolor(u32),
}

impl Color {
    /// The default foreground/background: SGR 39/49.
    pub const DEFAULT_FG: Color = Color::Standard16(39);
    pub const DEFAULT_BG: Color = Color::Standard16(49);

    pub fn truecolor(r: u8, g: u8, b: u8) -> Color {
        Color::Truecolor(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truecolor_packs_rgb_as_specified() {
        let c = Color::truecolor(0x12, 0x34, 0x56);
        assert_eq!(c, Color::Truecolor(0x00123456));
    }

    #[test]
    fn default_fg_and_bg_are_distinct_sgr_codes() {
        assert_eq!(Color::DEFAULT_FG, Color::Standard16(39));
        assert_eq!(Color::DEFAULT_BG, Color::Standard16(49));
    }
}

//! Terminal state machine core: parses a PTY byte stream (ECMA-48/VT100
//! control sequences plus the iTerm2 OSC 1337 inline-image extension) into
//! an attributed, scrollable, wide-character-aware grid.
//!
//! This crate has no opinion on rendering, PTY/process management, input
//! handling, or configuration — it owns only the state machine described
//! in `SPEC_FULL.md`. [`Terminal`] is the single entry point: feed it
//! bytes with [`Terminal::write`], read back the screen with
//! [`Terminal::get_visible_grid`].

mod attrs;
mod cell;
mod color;
mod csi;
mod cursor;
mod grid;
mod image_store;
mod osc;
mod parser;
mod scrollback;
mod terminal;
mod writer;

pub use attrs::{AttrFlags, Attributes};
pub use cell::Cell;
pub use color::Color;
pub use grid::Row;
pub use image_store::StoredImage;
pub use terminal::Terminal;

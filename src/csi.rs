use crate::attrs::AttrFlags;
use crate::color::Color;
use crate::terminal::Terminal;

/// Flatten `vte::Params`' sub-parameter groups (`:`-separated, used by
/// colon-delimited SGR extensions this crate doesn't implement) into the
/// flat parameter list spec.md §4.3 describes.
fn extract_params(params: &vte::Params) -> Vec<u32> {
    params.iter().flat_map(|sub| sub.iter().map(|&v| v as u32)).collect()
}

/// `param_k(default)`: the k-th (1-based) CSI parameter if present, else
/// `default` (spec.md §4.3).
fn param(params: &[u32], k: usize, default: u32) -> u32 {
    params.get(k - 1).copied().unwrap_or(default)
}

impl Terminal {
    /// Dispatch a fully-parsed CSI sequence on its final byte (spec.md
    /// §4.3). Unknown final bytes are silently ignored; `vte` returns its
    /// parser to GROUND after this call regardless of outcome.
    pub(crate) fn dispatch_csi(&mut self, raw_params: &vte::Params, _intermediates: &[u8], final_byte: char) {
        let params = extract_params(raw_params);
        match final_byte as u8 {
            b'A' => {
                self.pending_wrap = false;
                let n = param(&params, 1, 1).max(1) as u16;
                self.cursor.y = self.cursor.y.saturating_sub(n);
            }
            b'B' => {
                self.pending_wrap = false;
                let n = param(&params, 1, 1).max(1) as u16;
                self.cursor.y = (self.cursor.y + n).min(self.rows.saturating_sub(1));
            }
            b'C' => {
                self.pending_wrap = false;
                let n = param(&params, 1, 1).max(1) as u16;
                self.cursor.x = (self.cursor.x + n).min(self.cols.saturating_sub(1));
            }
            b'D' => {
                self.pending_wrap = false;
                let n = param(&params, 1, 1).max(1) as u16;
                self.cursor.x = self.cursor.x.saturating_sub(n);
            }
            b'H' | b'f' => {
                self.pending_wrap = false;
                let y = (param(&params, 1, 1) as u16).saturating_sub(1);
                let x = (param(&params, 2, 1) as u16).saturating_sub(1);
                self.cursor.y = y.min(self.rows.saturating_sub(1));
                self.cursor.x = x.min(self.cols.saturating_sub(1));
            }
            b'J' => self.erase_display(param(&params, 1, 0)),
            b'K' => self.erase_line(param(&params, 1, 0)),
            b'm' => self.handle_sgr(&params),
            _ => {
                tracing::trace!(?final_byte, "CSI: unknown final byte, ignoring");
            }
        }
    }

    fn erase_display(&mut self, mode: u32) {
        let (cx, cy, cols, rows) = (self.cursor.x, self.cursor.y, self.cols, self.rows);
        match mode {
            0 => {
                self.grid.clear_range(cy, cx, cols);
                for y in (cy + 1)..rows {
                    self.grid.clear_row(y);
                }
            }
            1 => {
                for y in 0..cy {
                    self.grid.clear_row(y);
                }
                self.grid.clear_range(cy, 0, cx + 1);
            }
            2 => {
                for y in 0..rows {
                    self.grid.clear_row(y);
                }
                self.pending_wrap = false;
                self.cursor.x = 0;
                self.cursor.y = 0;
            }
            3 => {
                // Erase-scrollback xterm extension: left as a no-op, matching
                // documented source behavior (spec.md §9 open question — not
                // guessed further).
            }
            _ => {}
        }
    }

    fn erase_line(&mut self, mode: u32) {
        let (cx, cy, cols) = (self.cursor.x, self.cursor.y, self.cols);
        match mode {
            0 => self.grid.clear_range(cy, cx, cols),
            1 => self.grid.clear_range(cy, 0, cx + 1),
            2 => self.grid.clear_row(cy),
            _ => {}
        }
    }

    /// SGR: iterate parameters left to right, mutating the active
    /// attributes (spec.md §4.3 "SGR semantics").
    fn handle_sgr(&mut self, raw: &[u32]) {
        let params: &[u32] = if raw.is_empty() { &[0] } else { raw };
        let mut i = 0;
        while i < params.len() {
            match params[i] {
                0 => self.attrs.reset(),
                1 => self.attrs.flags.insert(AttrFlags::BOLD),
                4 => self.attrs.flags.insert(AttrFlags::UNDERLINE),
                7 => self.attrs.flags.insert(AttrFlags::REVERSE),
                22 => self.attrs.flags.remove(AttrFlags::BOLD),
                24 => self.attrs.flags.remove(AttrFlags::UNDERLINE),
                27 => self.attrs.flags.remove(AttrFlags::REVERSE),
                30..=37 => self.attrs.fg = Color::Standard16(params[i] as u8),
                39 => self.attrs.fg = Color::DEFAULT_FG,
                40..=47 => self.attrs.bg = Color::Standard16(params[i] as u8),
                49 => self.attrs.bg = Color::DEFAULT_BG,
                38 => i = self.handle_extended_color(params, i, true),
                48 => i = self.handle_extended_color(params, i, false),
                other => {
                    tracing::trace!(code = other, "SGR: unknown code, ignoring");
                }
            }
            i += 1;
        }
    }

    /// Handle `38`/`48` extended-color sub-sequences. `i` points at the `38`
    /// or `48` itself; returns the index of the last parameter consumed so
    /// the caller's `i += 1` lands on the next unconsumed field.
    fn handle_extended_color(&mut self, params: &[u32], i: usize, is_fg: bool) -> usize {
        let mut i = i;
        i += 1;
        if i >= params.len() {
            return i - 1;
        }
        match params[i] {
            5 if i + 1 < params.len() => {
                let color = Color::Palette256(params[i + 1] as u8);
                if is_fg {
                    self.attrs.fg = color;
                } else {
                    self.attrs.bg = color;
                }
                i += 1;
            }
            2 if i + 3 < params.len() => {
                let color = Color::truecolor(params[i + 1] as u8, params[i + 2] as u8, params[i + 3] as u8);
                if is_fg {
                    self.attrs.fg = color;
                } else {
                    self.attrs.bg = color;
                }
                i += 3;
            }
            _ => {
                // Unsupported or truncated mode: consume only the mode
                // selector and continue (spec.md §4.3 "Any other mode:
                // consume one parameter and continue").
            }
        }
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(t: &mut Terminal, s: &str) {
        t.write(s.as_bytes());
    }

    #[test]
    fn cursor_motion_clamps_at_edges() {
        let mut t = Terminal::new(5, 5);
        feed(&mut t, "\x1b[10B");
        assert_eq!(t.get_cursor(), (0, 4));
        feed(&mut t, "\x1b[10A");
        assert_eq!(t.get_cursor(), (0, 0));
    }

    #[test]
    fn cup_is_one_based_and_clamped() {
        let mut t = Terminal::new(5, 5);
        feed(&mut t, "\x1b[3;2H");
        assert_eq!(t.get_cursor(), (1, 2));
        feed(&mut t, "\x1b[100;100H");
        assert_eq!(t.get_cursor(), (4, 4));
    }

    #[test]
    fn sgr_red_bold_then_reset() {
        let mut t = Terminal::new(1, 5);
        feed(&mut t, "\x1b[31;1mAB\x1b[0mC");
        let a = t.grid.cell(0, 0);
        let b = t.grid.cell(0, 1);
        let c = t.grid.cell(0, 2);
        assert_eq!(a.fg, Color::Standard16(31));
        assert!(a.flags.contains(AttrFlags::BOLD));
        assert_eq!(b.fg, Color::Standard16(31));
        assert_eq!(c.fg, Color::DEFAULT_FG);
        assert!(c.flags.is_empty());
    }

    #[test]
    fn sgr_truecolor_and_palette() {
        let mut t = Terminal::new(1, 5);
        feed(&mut t, "\x1b[38;2;10;20;30mA\x1b[48;5;200mB");
        let a = t.grid.cell(0, 0);
        let b = t.grid.cell(0, 1);
        assert_eq!(a.fg, Color::truecolor(10, 20, 30));
        assert_eq!(b.bg, Color::Palette256(200));
        // fg set on A should persist onto B since no reset occurred
        assert_eq!(b.fg, Color::truecolor(10, 20, 30));
    }

    #[test]
    fn erase_in_line_mode_0_clears_from_cursor_to_end() {
        let mut t = Terminal::new(1, 5);
        feed(&mut t, "ABCDE\x1b[1;3H\x1b[K");
        assert_eq!(t.grid.cell(0, 0).ch, 'A');
        assert_eq!(t.grid.cell(0, 1).ch, 'B');
        assert_eq!(t.grid.cell(0, 2).ch, ' ');
        assert_eq!(t.grid.cell(0, 3).ch, ' ');
        assert_eq!(t.grid.cell(0, 4).ch, ' ');
    }

    #[test]
    fn erase_in_display_mode_2_blanks_everything_and_homes_cursor() {
        let mut t = Terminal::new(2, 2);
        feed(&mut t, "ab\r\ncd\x1b[2J");
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(*t.grid.cell(y, x), crate::cell::Cell::default());
            }
        }
        assert_eq!(t.get_cursor(), (0, 0));
    }

    #[test]
    fn unknown_csi_final_byte_is_ignored() {
        let mut t = Terminal::new(1, 5);
        feed(&mut t, "\x1b[5ZA");
        assert_eq!(t.grid.cell(0, 0).ch, 'A');
    }
}

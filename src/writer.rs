use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;
use crate::terminal::Terminal;

impl Terminal {
    /// Place one decoded scalar at the cursor with the active attributes,
    /// honoring display width and line wrap (spec.md §4.2).
    pub(crate) fn write_char(&mut self, ch: char) {
        // Zero-width/combining scalars are dropped in v1 rather than folded
        // into the preceding cell (spec.md §4.2, §9 open question — left
        // unresolved per spec, not guessed here).
        if UnicodeWidthChar::width(ch) == Some(0) {
            return;
        }
        let width = UnicodeWidthChar::width(ch).unwrap_or(1).min(2) as u16;

        // A deferred wrap from a previous write that exactly filled the
        // last column takes effect now, before this character is placed
        // (invariant I1: `cursor.x` itself is never left at `cols`).
        if self.pending_wrap {
            self.pending_wrap = false;
            self.cursor.x = 0;
            self.linefeed();
        }

        if self.cursor.x + width > self.cols {
            self.cursor.x = 0;
            self.linefeed();
        }

        let fg = self.attrs.fg;
        let bg = self.attrs.bg;
        let flags = self.attrs.flags;
        let (row, col) = (self.cursor.y, self.cursor.x);

        self.grid
            .set_cell(row, col, Cell::with_attrs(ch, width as u8, fg, bg, flags));

        if width == 2 && col + 1 < self.cols {
            self.grid.set_cell(row, col + 1, Cell::continuation(bg));
        }

        self.cursor.x += width;
        if self.cursor.x >= self.cols {
            self.cursor.x = self.cols - 1;
            self.pending_wrap = true;
        }
    }
}

use crate::terminal::Terminal;

impl Terminal {
    /// Feed a chunk of PTY bytes into the parser (spec.md §4.1). The `vte`
    /// state machine persists across calls — including a partially decoded
    /// UTF-8 scalar or an in-progress CSI/OSC sequence — so splitting one
    /// logical byte stream into arbitrarily many `write` calls produces
    /// identical final state (invariant P1, "chunking invariance").
    pub fn write(&mut self, bytes: &[u8]) {
        // Take ownership of the parser temporarily: `vte::Parser::advance`
        // needs `&mut self` as its `Perform` sink, which would otherwise
        // alias a `parser` field borrowed from the same `self`.
        let mut parser = std::mem::replace(&mut self.parser, vte::Parser::new());
        for &b in bytes {
            parser.advance(self, b);
        }
        self.parser = parser;
    }

    /// Advance to the next multiple-of-8 column, clamped to the last
    /// column (spec.md §9 open question, resolved: HT is implemented).
    pub(crate) fn tab(&mut self) {
        self.pending_wrap = false;
        let next = (self.cursor.x / 8 + 1) * 8;
        self.cursor.x = next.min(self.cols.saturating_sub(1));
    }
}

impl vte::Perform for Terminal {
    fn print(&mut self, c: char) {
        self.write_char(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            0x0A => {
                self.pending_wrap = false;
                self.linefeed();
            }
            0x0D => {
                self.pending_wrap = false;
                self.cursor.x = 0;
            }
            0x08 => {
                self.pending_wrap = false;
                self.cursor.x = self.cursor.x.saturating_sub(1);
            }
            0x09 => self.tab(),
            _ => {
                // Other C0 controls (BEL, VT, FF, ...) are ignored (spec.md
                // §4.1 "unhandled C0 controls are no-ops").
            }
        }
    }

    fn csi_dispatch(&mut self, params: &vte::Params, intermediates: &[u8], _ignore: bool, action: char) {
        self.dispatch_csi(params, intermediates, action);
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        self.dispatch_osc(params);
    }

    // `hook`/`put`/`unhook` (DCS) and `esc_dispatch` (ESC intermediates,
    // character-set designation) are left at `vte::Perform`'s default
    // no-op impls: DCS has no counterpart in this emulator, and
    // `ESC ( / ) / * / +` designation is parsed-but-ignored in v1 (spec.md
    // §4.1 "ESC_INTERMEDIATE").
}

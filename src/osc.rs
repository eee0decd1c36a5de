use crate::terminal::Terminal;

impl Terminal {
    /// Dispatch a complete OSC command, already split on `;` by `vte` into
    /// one slice per field (spec.md §4.4). Only `1337;File=...` is
    /// recognized; every other OSC command is ignored.
    ///
    /// `vte`'s OSC splitting is semicolon-per-field for the *whole*
    /// payload, which also includes the `;`-separated `OPTS` of spec.md
    /// §6's `File=K1=V1;K2=V2;…:BASE64` grammar — so `params[1..]` is
    /// rejoined with `;` before being handed to the `File=` parser below,
    /// the same way the teacher's `handle_osc` rejoins multi-field OSC
    /// command args (e.g. its "133;B;<cmd>" shell-integration handling).
    pub(crate) fn dispatch_osc(&mut self, params: &[&[u8]]) {
        let Some(&command) = params.first() else {
            return;
        };

        if command != b"1337" {
            tracing::trace!(command = %String::from_utf8_lossy(command), "OSC: unrecognized command, ignoring");
            return;
        }

        let rejoined = params[1..]
            .iter()
            .map(|field| String::from_utf8_lossy(field))
            .collect::<Vec<_>>()
            .join(";");

        let Some(file_args) = rejoined.strip_prefix("File=") else {
            tracing::trace!("OSC 1337: not a File= payload, ignoring");
            return;
        };

        self.handle_osc_1337_file(file_args);
    }

    /// `File=OPTS:BASE64` (spec.md §4.4 "iTerm2 inline image protocol").
    /// `OPTS` is a `;`-separated `key=value` list (spec.md §6's bit-level
    /// format: `File=K1=V1;K2=V2;…:BASE64`). Unknown keys are ignored;
    /// only `inline=1` payloads are rendered into the grid.
    fn handle_osc_1337_file(&mut self, file_args: &str) {
        let Some((opts, base64_data)) = file_args.split_once(':') else {
            tracing::trace!("OSC 1337 File=: missing ':' separator, ignoring");
            return;
        };

        let mut inline = false;
        let mut width = String::from("auto");
        let mut height = String::from("auto");
        let mut preserve_aspect = true;

        for opt in opts.split(';') {
            let Some((key, value)) = opt.split_once('=') else {
                continue;
            };
            match key.to_ascii_lowercase().as_str() {
                "inline" => inline = value == "1",
                "width" => width = value.to_string(),
                "height" => height = value.to_string(),
                "preserveaspectratio" => preserve_aspect = value != "0",
                _ => {}
            }
        }

        if !inline {
            tracing::trace!("OSC 1337 File=: inline != 1, ignoring");
            return;
        }

        let (row, col) = (self.cursor.y, self.cursor.x);
        let id = self.images.insert(row, col, base64_data, width, height, preserve_aspect);

        if id.is_some() && row < self.rows && col < self.cols {
            let mut cell = *self.grid.cell(row, col);
            cell.is_image_anchor = true;
            self.grid.set_cell(row, col, cell);
        }
    }
}

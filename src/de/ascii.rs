use tracing::{instrument, warn};

use super::transcode_row;
use super::val_reader::AsciiValReader;
use crate::ser::val_writer::BinValWriter;
use crate::{ElementDef, PlyError, Result};

/// Decode an ASCII body into a packed buffer.
///
/// Each non-blank line holds exactly one element instance. A line with too
/// few or too many tokens for its element fails with [`PlyError::Parse`].
#[instrument(skip_all, fields(body_len = body.len()))]
pub fn decode_ascii(elements: &[ElementDef], body: &[u8]) -> Result<Vec<u8>> {
    let mut lines = body
        .split(|&b| b == b'\n')
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace));
    let mut writer = BinValWriter::new(Vec::new());

    for element in elements {
        for index in 0..element.count {
            let parse_error = |reason: String| PlyError::Parse {
                element: element.name.clone(),
                index,
                reason,
            };

            let line = lines
                .next()
                .ok_or_else(|| parse_error("unexpected end of body".to_string()))?;
            let line = std::str::from_utf8(line).map_err(|e| parse_error(e.to_string()))?;

            let mut reader = AsciiValReader::new(line);
            transcode_row(&mut reader, &mut writer, element)
                .map_err(|e| parse_error(e.to_string()))?;
        }
    }

    let extra = lines.count();
    if extra > 0 {
        warn!(extra, "ignoring lines after the last declared element");
    }

    Ok(writer.into_inner())
}

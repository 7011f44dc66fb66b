use std::io::Write;

use super::val_writer::AsciiValWriter;
use crate::de::transcode_row;
use crate::de::val_reader::BinValReader;
use crate::{ElementDef, PlyError, Result};

/// Render a packed buffer as ASCII records, one line per element instance,
/// fields separated by single spaces.
pub fn write_ascii_body<W: Write>(elements: &[ElementDef], data: &[u8], writer: W) -> Result<()> {
    let mut reader = BinValReader::new(data);
    let mut writer = AsciiValWriter::new(writer);

    for element in elements {
        for index in 0..element.count {
            match transcode_row(&mut reader, &mut writer, element) {
                Ok(()) => {}
                Err(PlyError::NoPropertyFound) => {
                    return Err(PlyError::Truncated {
                        element: element.name.clone(),
                        index,
                    })
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}

//! Body encoding: from the packed buffer back to file bytes.

mod ascii;

pub mod val_writer;

use std::io::Write;

use tracing::instrument;

pub use ascii::write_ascii_body;

use crate::{PlyError, PlyFormat, PlyHeader, Result};

/// Write a complete PLY file (header and body) in `format`.
#[instrument(skip_all, fields(%format, data_len = data.len()))]
pub fn to_writer<W: Write>(
    header: &PlyHeader,
    data: &[u8],
    format: PlyFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        PlyFormat::Ascii => {
            header.write(&mut writer, format)?;
            write_ascii_body(&header.elements, data, &mut writer)?;
        }
        PlyFormat::BinaryLittleEndian => {
            header.write(&mut writer, format)?;
            writer.write_all(data)?;
        }
        PlyFormat::BinaryBigEndian => {
            return Err(PlyError::UnsupportedFormat(
                "binary_big_endian output is not supported".to_string(),
            ))
        }
    }
    writer.flush()?;
    Ok(())
}

/// Serializes a complete PLY file into memory.
pub fn to_bytes(header: &PlyHeader, data: &[u8], format: PlyFormat) -> Result<Vec<u8>> {
    let mut buf = vec![];
    to_writer(header, data, format, &mut buf)?;
    Ok(buf)
}

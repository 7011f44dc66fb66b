//! Body decoding: from file bytes to the packed little-endian buffer.

mod ascii;
mod binary;

pub mod val_reader;

use std::io;
use std::ops::Range;

pub use ascii::decode_ascii;
pub use binary::decode_binary;

use crate::ser::val_writer::{BinValWriter, ScalarWriter};
use crate::{ElementDef, PlyError, PlyFormat, PlyHeader, PropertyType, Result};
use val_reader::{BinValReader, ScalarReader};

/// Decode the body that follows `header` into a packed buffer.
pub fn decode_body(header: &PlyHeader, body: &[u8]) -> Result<Vec<u8>> {
    match header.format {
        PlyFormat::Ascii => decode_ascii(&header.elements, body),
        PlyFormat::BinaryLittleEndian | PlyFormat::BinaryBigEndian => {
            decode_binary(header.format, &header.elements, body)
        }
    }
}

/// Move one record from `reader` to `writer`, property by property.
///
/// List counts are written before their items, so the output always has the
/// packed `[count][item]*count` shape regardless of the source encoding.
pub(crate) fn transcode_row<R, W>(reader: &mut R, writer: &mut W, element: &ElementDef) -> Result<()>
where
    R: ScalarReader,
    W: ScalarWriter,
{
    for property in &element.properties {
        match property.property_type {
            PropertyType::Scalar { data_type } => {
                writer.write_scalar(reader.read_scalar(data_type)?)?;
            }
            PropertyType::List {
                count_type,
                data_type,
            } => {
                let count_value = reader.read_scalar(count_type)?;
                let count = count_value
                    .to_count()
                    .ok_or_else(|| PlyError::InvalidValue {
                        token: count_value.to_string(),
                        data_type: count_type,
                    })?;
                writer.write_scalar(count_value)?;
                for _ in 0..count {
                    writer.write_scalar(reader.read_scalar(data_type)?)?;
                }
            }
        }
    }
    reader.read_row_end()?;
    writer.write_row_end()
}

/// Byte range of each element inside a packed buffer, in declaration order.
///
/// Elements with list properties have to be walked record by record since
/// their size depends on the stored counts.
pub fn element_spans(elements: &[ElementDef], data: &[u8]) -> Result<Vec<Range<usize>>> {
    let mut reader = BinValReader::new(data);
    let mut sink = BinValWriter::new(io::sink());
    let mut spans = Vec::with_capacity(elements.len());

    for element in elements {
        let start = reader.position();
        let truncated = |index| PlyError::Truncated {
            element: element.name.clone(),
            index,
        };

        match element.record_width() {
            Some(width) => {
                let len = width.checked_mul(element.count).ok_or_else(|| truncated(0))?;
                if !reader.skip(len) {
                    let index = reader.remaining().checked_div(width).unwrap_or(0);
                    return Err(truncated(index));
                }
            }
            None => {
                for index in 0..element.count {
                    match transcode_row(&mut reader, &mut sink, element) {
                        Ok(()) => {}
                        Err(PlyError::NoPropertyFound) => return Err(truncated(index)),
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        spans.push(start..reader.position());
    }

    Ok(spans)
}

use tracing::{instrument, warn};

use super::element_spans;
use crate::{ElementDef, PlyError, PlyFormat, Result};

/// Decode a binary body.
///
/// A little-endian body already has the packed layout, so it is taken as is
/// once it has been checked to hold every declared record. Big-endian bodies
/// are rejected rather than guessed at.
#[instrument(skip_all, fields(body_len = body.len()))]
pub fn decode_binary(format: PlyFormat, elements: &[ElementDef], body: &[u8]) -> Result<Vec<u8>> {
    match format {
        PlyFormat::BinaryLittleEndian => {}
        PlyFormat::BinaryBigEndian => {
            return Err(PlyError::UnsupportedFormat(
                "binary_big_endian bodies are not supported".to_string(),
            ))
        }
        PlyFormat::Ascii => {
            return Err(PlyError::UnsupportedFormat(
                "ascii body passed to the binary decoder".to_string(),
            ))
        }
    }

    let spans = element_spans(elements, body)?;
    let used = spans.last().map_or(0, |span| span.end);
    if used < body.len() {
        warn!(trailing = body.len() - used, "binary body has trailing bytes");
    }

    Ok(body.to_vec())
}

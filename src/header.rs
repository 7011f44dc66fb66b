use std::io::Write;

use tracing::debug;

use crate::{ElementDef, PlyError, PlyFormat, PlyHeader, PlyProperty, PropertyType, Result, ScalarType};

/// Comment written at the top of every header this crate produces.
pub const CREATOR_COMMENT: &str = "Created by DotNet3d";

impl PlyHeader {
    /// Parse the header at the start of `bytes`.
    ///
    /// Returns the header and the offset of the first body byte. The line
    /// terminator used after `ply` (`\n` or `\r\n`) must be used by every
    /// following header line.
    pub fn parse(bytes: &[u8]) -> Result<(Self, usize)> {
        if !bytes.starts_with(b"ply") {
            return Err(PlyError::InvalidHeader(
                "File must start with 'ply'".to_string(),
            ));
        }

        let terminator: &[u8] = match &bytes[3..] {
            [b'\n', ..] => b"\n",
            [b'\r', b'\n', ..] => b"\r\n",
            _ => {
                return Err(PlyError::InvalidHeader(
                    "Expected a line break after 'ply'".to_string(),
                ))
            }
        };
        let mut position = 3 + terminator.len();

        let mut format = None;
        let mut version = String::new();
        let mut elements: Vec<ElementDef> = Vec::new();
        let mut comments = Vec::new();
        let mut obj_info = Vec::new();

        loop {
            let rest = &bytes[position..];
            let Some(newline) = rest.iter().position(|&b| b == b'\n') else {
                return Err(PlyError::InvalidHeader(
                    "Unexpected end of file".to_string(),
                ));
            };
            let raw_line = &rest[..=newline];
            let crlf = raw_line.ends_with(b"\r\n");
            if crlf != (terminator.len() == 2) {
                return Err(PlyError::InvalidHeader(
                    "Inconsistent line endings".to_string(),
                ));
            }
            position += raw_line.len();

            let line = std::str::from_utf8(&raw_line[..raw_line.len() - terminator.len()])?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some(&keyword) = parts.first() else {
                continue;
            };

            match keyword {
                "end_header" => break,
                "format" => {
                    if parts.len() < 3 {
                        return Err(PlyError::InvalidHeader("Invalid format line".to_string()));
                    }
                    format = Some(PlyFormat::parse(parts[1])?);
                    version = parts[2].to_string();
                }
                "comment" => {
                    comments.push(parts[1..].join(" "));
                }
                "obj_info" => {
                    obj_info.push(parts[1..].join(" "));
                }
                "element" => {
                    if parts.len() < 3 {
                        return Err(PlyError::InvalidHeader("Invalid element line".to_string()));
                    }
                    let count = parts[2].parse::<usize>().map_err(|_| {
                        PlyError::InvalidHeader(format!("Invalid element count: {}", parts[2]))
                    })?;
                    elements.push(ElementDef::new(parts[1], count));
                }
                "property" => {
                    let element = elements.last_mut().ok_or_else(|| {
                        PlyError::InvalidHeader("Property without element".to_string())
                    })?;
                    element.properties.push(parse_property(&parts)?);
                }
                other => {
                    return Err(PlyError::InvalidHeader(format!(
                        "Unknown header keyword: {other}"
                    )));
                }
            }
        }

        let format = format
            .ok_or_else(|| PlyError::InvalidHeader("Missing format specification".to_string()))?;

        debug!(
            %format,
            elements = elements.len(),
            body_offset = position,
            "parsed ply header"
        );

        Ok((
            PlyHeader {
                format,
                version,
                elements,
                comments,
                obj_info,
            },
            position,
        ))
    }

    /// Write the header text, declaring `format` as the body encoding.
    pub fn write<W: Write>(&self, mut writer: W, format: PlyFormat) -> Result<()> {
        let version = if self.version.is_empty() {
            "1.0"
        } else {
            self.version.as_str()
        };
        writeln!(writer, "ply")?;
        writeln!(writer, "format {format} {version}")?;
        if !self.comments.iter().any(|c| c == CREATOR_COMMENT) {
            writeln!(writer, "comment {CREATOR_COMMENT}")?;
        }
        for comment in &self.comments {
            writeln!(writer, "comment {comment}")?;
        }
        for info in &self.obj_info {
            writeln!(writer, "obj_info {info}")?;
        }
        for element in &self.elements {
            writeln!(writer, "element {} {}", element.name, element.count)?;
            for property in &element.properties {
                match property.property_type {
                    PropertyType::Scalar { data_type } => {
                        writeln!(writer, "property {data_type} {}", property.name)?
                    }
                    PropertyType::List {
                        count_type,
                        data_type,
                    } => writeln!(
                        writer,
                        "property list {count_type} {data_type} {}",
                        property.name
                    )?,
                }
            }
        }
        writeln!(writer, "end_header")?;
        Ok(())
    }
}

fn parse_property(parts: &[&str]) -> Result<PlyProperty> {
    if parts.len() < 3 {
        return Err(PlyError::InvalidHeader("Invalid property line".to_string()));
    }

    if parts[1] == "list" {
        // property list <count_type> <data_type> <name>
        if parts.len() < 5 {
            return Err(PlyError::InvalidHeader(
                "Invalid list property line".to_string(),
            ));
        }
        let count_type = ScalarType::parse(parts[2])?;
        let data_type = ScalarType::parse(parts[3])?;
        Ok(PlyProperty::list(parts[4], count_type, data_type))
    } else {
        Ok(PlyProperty::scalar(parts[2], ScalarType::parse(parts[1])?))
    }
}

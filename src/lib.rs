//! Reading, writing and converting PLY (Polygon File Format) files.
//!
//! A PLY file is decoded into a [`Ply`]: the parsed [`PlyHeader`] plus one
//! packed little-endian byte buffer holding every element instance back to
//! back, in declaration order. The first `vertex` element of a list-free
//! schema can be viewed as a [`PointCloud`], which gives random access to
//! named fields and in-place geometric transforms.
//!
//! # Example
//!
//! ```rust
//! use ply_cloud::{Ply, PlyFormat, ScalarValue};
//!
//! let ply_data = b"ply
//! format ascii 1.0
//! element vertex 2
//! property float x
//! property float y
//! property float z
//! end_header
//! 1 2 3
//! 4 5 6
//! ";
//!
//! let ply = Ply::from_bytes(ply_data).unwrap();
//! let mut cloud = ply.to_point_cloud().unwrap();
//! assert_eq!(cloud.get("y", 1).unwrap(), ScalarValue::F32(5.0));
//!
//! cloud.multiply(&glam::DMat4::from_scale(glam::DVec3::splat(2.0))).unwrap();
//! assert_eq!(cloud.to_string(), "2 4 6\n8 10 12\n");
//!
//! let binary = Ply::from(cloud).to_bytes(PlyFormat::BinaryLittleEndian).unwrap();
//! assert!(binary.starts_with(b"ply\nformat binary_little_endian 1.0\n"));
//! ```

pub mod de;
pub mod ser;

mod error;
mod header;
mod point_cloud;
mod ply;
mod scalar;

pub use error::{PlyError, Result};
pub use header::CREATOR_COMMENT;
pub use ply::Ply;
pub use point_cloud::{PointCloud, PointProperty};
pub use scalar::{ScalarType, ScalarValue};

use serde::{Deserialize, Serialize};
use std::fmt;

/// PLY body encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl PlyFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "ascii" => Ok(PlyFormat::Ascii),
            "binary_little_endian" => Ok(PlyFormat::BinaryLittleEndian),
            "binary_big_endian" => Ok(PlyFormat::BinaryBigEndian),
            _ => Err(PlyError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlyFormat::Ascii => write!(f, "ascii"),
            PlyFormat::BinaryLittleEndian => write!(f, "binary_little_endian"),
            PlyFormat::BinaryBigEndian => write!(f, "binary_big_endian"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    /// A scalar property with a single value
    Scalar { data_type: ScalarType },
    /// A list property: a count followed by that many items
    List {
        count_type: ScalarType,
        data_type: ScalarType,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlyProperty {
    pub name: String,
    pub property_type: PropertyType,
}

impl PlyProperty {
    pub fn scalar(name: impl Into<String>, data_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            property_type: PropertyType::Scalar { data_type },
        }
    }

    pub fn list(name: impl Into<String>, count_type: ScalarType, data_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            property_type: PropertyType::List {
                count_type,
                data_type,
            },
        }
    }
}

/// PLY element definition (e.g., vertex, face)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDef {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PlyProperty>,
}

impl ElementDef {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
            properties: Vec::new(),
        }
    }

    pub fn has_list(&self) -> bool {
        self.properties
            .iter()
            .any(|p| matches!(p.property_type, PropertyType::List { .. }))
    }

    /// Bytes per instance, or `None` when a list property makes it data dependent.
    pub fn record_width(&self) -> Option<usize> {
        self.properties
            .iter()
            .map(|p| match p.property_type {
                PropertyType::Scalar { data_type } => Some(data_type.size_bytes()),
                PropertyType::List { .. } => None,
            })
            .sum()
    }
}

/// PLY header containing format information and element definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub version: String,
    pub elements: Vec<ElementDef>,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
}

impl PlyHeader {
    pub fn new(format: PlyFormat, elements: Vec<ElementDef>) -> Self {
        Self {
            format,
            version: "1.0".to_string(),
            elements,
            comments: Vec::new(),
            obj_info: Vec::new(),
        }
    }

    /// Get element definition by name
    pub fn get_element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Check if this header defines an element with the given name
    pub fn has_element(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }
}

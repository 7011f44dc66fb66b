use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::ops::Range;
use std::path::Path;

use glam::{DMat4, DVec3};
use tracing::{debug, instrument};

use crate::de::{decode_body, element_spans};
use crate::ser;
use crate::{
    ElementDef, PlyError, PlyFormat, PlyHeader, PlyProperty, PointCloud, PointProperty,
    PropertyType, Result, ScalarType,
};

/// Distance from the origin to the x and y axis tips of a synthesized gizmo.
/// The z tip sits twice as far so it is easy to tell apart.
const AXIS_LENGTH: f64 = 500.0;

const AXIS_COLORS: [[u8; 3]; 3] = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];

/// A PLY schema together with its packed body.
#[derive(Debug, Clone, PartialEq)]
pub struct Ply {
    header: PlyHeader,
    data: Vec<u8>,
}

impl Ply {
    /// Pair a header with an already packed buffer. The buffer must hold
    /// every record the header declares.
    pub fn new(header: PlyHeader, data: Vec<u8>) -> Result<Self> {
        element_spans(&header.elements, &data)?;
        Ok(Self { header, data })
    }

    #[instrument(skip_all, fields(len = bytes.len()))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (header, body_offset) = PlyHeader::parse(bytes)?;
        let data = decode_body(&header, &bytes[body_offset..])?;
        debug!(data_len = data.len(), "decoded ply body");
        Ok(Self { header, data })
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }

    pub fn header(&self) -> &PlyHeader {
        &self.header
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_parts(self) -> (PlyHeader, Vec<u8>) {
        (self.header, self.data)
    }

    /// Byte range of each element inside [`Ply::data`].
    pub fn element_spans(&self) -> Result<Vec<Range<usize>>> {
        element_spans(&self.header.elements, &self.data)
    }

    pub fn write<W: Write>(&self, writer: W, format: PlyFormat) -> Result<()> {
        ser::to_writer(&self.header, &self.data, format, writer)
    }

    pub fn to_bytes(&self, format: PlyFormat) -> Result<Vec<u8>> {
        ser::to_bytes(&self.header, &self.data, format)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display(), %format))]
    pub fn save(&self, path: impl AsRef<Path>, format: PlyFormat) -> Result<()> {
        let file = File::create(path)?;
        self.write(BufWriter::new(file), format)
    }

    pub fn save_ascii(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save(path, PlyFormat::Ascii)
    }

    pub fn save_binary(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save(path, PlyFormat::BinaryLittleEndian)
    }

    /// View the leading `vertex` element as a point cloud.
    ///
    /// The first element must be named `vertex` and hold no list properties,
    /// since point clouds need fixed-width records.
    pub fn to_point_cloud(&self) -> Result<PointCloud> {
        let element = match self.header.elements.first() {
            Some(element) if element.name == "vertex" => element,
            Some(element) => {
                return Err(PlyError::UnsupportedLayout(format!(
                    "first element is '{}', expected 'vertex'",
                    element.name
                )))
            }
            None => {
                return Err(PlyError::UnsupportedLayout(
                    "no elements declared".to_string(),
                ))
            }
        };

        let properties = element
            .properties
            .iter()
            .map(|p| match p.property_type {
                PropertyType::Scalar { data_type } => {
                    Ok(PointProperty::new(p.name.clone(), data_type))
                }
                PropertyType::List { .. } => Err(PlyError::UnsupportedLayout(format!(
                    "vertex property '{}' is a list",
                    p.name
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        let width: usize = properties.iter().map(|p| p.data_type.size_bytes()).sum();
        let end = width * element.count;
        let data = self.data.get(..end).ok_or_else(|| PlyError::Truncated {
            element: element.name.clone(),
            index: self.data.len() / width.max(1),
        })?;

        PointCloud::new(element.count, properties, data.to_vec())
    }

    /// A single `vertex` element holding the cloud's records unchanged.
    pub fn from_point_cloud(cloud: PointCloud) -> Self {
        let header = PlyHeader::new(PlyFormat::Ascii, vec![cloud.element_def()]);
        Self {
            header,
            data: cloud.into_data(),
        }
    }

    /// A `vertex` element with float `x, y, z`, one record per point.
    pub fn from_points(points: &[DVec3]) -> Self {
        Self::from_point_cloud(PointCloud::from_points(points))
    }

    pub fn from_transform(transform: &DMat4) -> Self {
        Self::from_transforms(std::slice::from_ref(transform))
    }

    /// Axis gizmos for a set of poses.
    ///
    /// Each transform contributes four colored vertices (origin, x, y and z
    /// tips) and three edges from the origin to each tip. The origin of
    /// gizmo `i` is colored `(i, i, i)`; the tips and edges are red, green
    /// and blue for x, y and z.
    pub fn from_transforms(transforms: &[DMat4]) -> Self {
        let mut vertex = ElementDef::new("vertex", 4 * transforms.len());
        for name in ["x", "y", "z"] {
            vertex
                .properties
                .push(PlyProperty::scalar(name, ScalarType::F32));
        }
        let mut edge = ElementDef::new("edge", 3 * transforms.len());
        for name in ["vertex1", "vertex2"] {
            edge.properties
                .push(PlyProperty::scalar(name, ScalarType::I32));
        }
        for name in ["red", "green", "blue", "alpha"] {
            vertex
                .properties
                .push(PlyProperty::scalar(name, ScalarType::U8));
            edge.properties
                .push(PlyProperty::scalar(name, ScalarType::U8));
        }

        let mut data = Vec::new();
        let tips = [
            DVec3::new(AXIS_LENGTH, 0.0, 0.0),
            DVec3::new(0.0, AXIS_LENGTH, 0.0),
            DVec3::new(0.0, 0.0, 2.0 * AXIS_LENGTH),
        ];

        for (i, transform) in transforms.iter().enumerate() {
            let shade = i as u8;
            push_vertex(&mut data, transform.transform_point3(DVec3::ZERO), [shade; 3]);
            for (tip, color) in tips.iter().zip(AXIS_COLORS) {
                push_vertex(&mut data, transform.transform_point3(*tip), color);
            }
        }

        for i in 0..transforms.len() {
            let origin = (4 * i) as i32;
            for (axis, color) in AXIS_COLORS.iter().enumerate() {
                data.extend_from_slice(&origin.to_le_bytes());
                data.extend_from_slice(&(origin + 1 + axis as i32).to_le_bytes());
                data.extend_from_slice(color);
                data.push(u8::MAX);
            }
        }

        Self {
            header: PlyHeader::new(PlyFormat::Ascii, vec![vertex, edge]),
            data,
        }
    }
}

fn push_vertex(data: &mut Vec<u8>, position: DVec3, color: [u8; 3]) {
    for component in position.as_vec3().to_array() {
        data.extend_from_slice(&component.to_le_bytes());
    }
    data.extend_from_slice(&color);
    data.push(u8::MAX);
}

impl From<PointCloud> for Ply {
    fn from(cloud: PointCloud) -> Self {
        Self::from_point_cloud(cloud)
    }
}

/// The whole file in ASCII form, header included.
impl fmt::Display for Ply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes(PlyFormat::Ascii).map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(&bytes).map_err(|_| fmt::Error)?)
    }
}

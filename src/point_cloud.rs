use std::collections::HashSet;
use std::fmt;
use std::ops::Add;

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::ser::write_ascii_body;
use crate::{ElementDef, PlyError, PlyProperty, Result, ScalarType, ScalarValue};

/// A named scalar field of a point record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointProperty {
    pub name: String,
    pub data_type: ScalarType,
}

impl PointProperty {
    pub fn new(name: impl Into<String>, data_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Fixed-width records packed back to back.
///
/// Record `i` starts at `i * record_width()`; a field sits after the fields
/// declared before it. Values are little-endian at their natural width.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    count: usize,
    properties: Vec<PointProperty>,
    data: Vec<u8>,
}

/// Offsets of three same-typed fields read together as a vector.
struct Triple {
    offsets: [usize; 3],
    data_type: ScalarType,
}

impl PointCloud {
    pub fn new(count: usize, properties: Vec<PointProperty>, data: Vec<u8>) -> Result<Self> {
        {
            let mut seen = HashSet::new();
            if let Some(duplicate) = properties.iter().find(|p| !seen.insert(p.name.as_str())) {
                return Err(PlyError::SchemaMismatch(format!(
                    "duplicate property name: {}",
                    duplicate.name
                )));
            }
        }

        let width: usize = properties.iter().map(|p| p.data_type.size_bytes()).sum();
        if Some(data.len()) != width.checked_mul(count) {
            return Err(PlyError::SchemaMismatch(format!(
                "buffer holds {} bytes, {count} records of {width} bytes need {}",
                data.len(),
                width.saturating_mul(count)
            )));
        }

        Ok(Self {
            count,
            properties,
            data,
        })
    }

    /// An `x, y, z` float cloud with one record per point.
    pub fn from_points(points: &[DVec3]) -> Self {
        let properties = ["x", "y", "z"]
            .into_iter()
            .map(|name| PointProperty::new(name, ScalarType::F32))
            .collect();
        let data = points
            .iter()
            .flat_map(|p| p.as_vec3().to_array())
            .flat_map(f32::to_le_bytes)
            .collect();
        Self {
            count: points.len(),
            properties,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn properties(&self) -> &[PointProperty] {
        &self.properties
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn record_width(&self) -> usize {
        self.properties.iter().map(|p| p.data_type.size_bytes()).sum()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }

    /// The equivalent PLY element definition, named `vertex`.
    pub fn element_def(&self) -> ElementDef {
        ElementDef {
            name: "vertex".to_string(),
            count: self.count,
            properties: self
                .properties
                .iter()
                .map(|p| PlyProperty::scalar(p.name.clone(), p.data_type))
                .collect(),
        }
    }

    fn field(&self, name: &str) -> Result<(usize, ScalarType)> {
        let mut offset = 0;
        for property in &self.properties {
            if property.name == name {
                return Ok((offset, property.data_type));
            }
            offset += property.data_type.size_bytes();
        }
        Err(PlyError::MissingField(name.to_string()))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.count {
            Ok(())
        } else {
            Err(PlyError::IndexOutOfBounds {
                index,
                count: self.count,
            })
        }
    }

    fn read_at(&self, offset: usize, data_type: ScalarType) -> Result<ScalarValue> {
        ScalarValue::read_le(&self.data, offset, data_type).ok_or(PlyError::IndexOutOfBounds {
            index: offset,
            count: self.data.len(),
        })
    }

    fn write_at(&mut self, offset: usize, value: ScalarValue) -> Result<()> {
        let len = self.data.len();
        value
            .write_le(&mut self.data, offset)
            .ok_or(PlyError::IndexOutOfBounds {
                index: offset,
                count: len,
            })
    }

    pub fn get(&self, name: &str, index: usize) -> Result<ScalarValue> {
        let (offset, data_type) = self.field(name)?;
        self.check_index(index)?;
        self.read_at(index * self.record_width() + offset, data_type)
    }

    /// Overwrite one field in place. The value is converted to the field's type.
    pub fn set(&mut self, name: &str, index: usize, value: impl Into<ScalarValue>) -> Result<()> {
        let (offset, data_type) = self.field(name)?;
        self.check_index(index)?;
        let position = index * self.record_width() + offset;
        self.write_at(position, value.into().cast(data_type))
    }

    /// Records of `self` followed by records of `other`. Both must declare the
    /// same properties in the same order.
    pub fn concat(&self, other: &PointCloud) -> Result<PointCloud> {
        if self.properties != other.properties {
            return Err(PlyError::SchemaMismatch(
                "point clouds have different properties".to_string(),
            ));
        }
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Ok(PointCloud {
            count: self.count + other.count,
            properties: self.properties.clone(),
            data,
        })
    }

    fn triple(&self, names: [&str; 3]) -> Result<Triple> {
        let (x, x_type) = self.field(names[0])?;
        let (y, y_type) = self.field(names[1])?;
        let (z, z_type) = self.field(names[2])?;
        if x_type != y_type || x_type != z_type {
            return Err(PlyError::SchemaMismatch(format!(
                "{}, {} and {} must share one type",
                names[0], names[1], names[2]
            )));
        }
        Ok(Triple {
            offsets: [x, y, z],
            data_type: x_type,
        })
    }

    fn read_triple(&self, record: usize, triple: &Triple) -> Result<DVec3> {
        let [x, y, z] = triple.offsets.map(|offset| record + offset);
        Ok(DVec3::new(
            self.read_at(x, triple.data_type)?.to_f64(),
            self.read_at(y, triple.data_type)?.to_f64(),
            self.read_at(z, triple.data_type)?.to_f64(),
        ))
    }

    fn write_triple(&mut self, record: usize, triple: &Triple, v: DVec3) -> Result<()> {
        for (offset, component) in triple.offsets.iter().zip(v.to_array()) {
            let value = ScalarValue::from_f64(component, triple.data_type);
            self.write_at(record + offset, value)?;
        }
        Ok(())
    }

    /// Apply `transform` to every position (`x, y, z`) and, when present,
    /// every normal (`nx, ny, nz`). Normals see only the linear part and are
    /// not renormalized.
    #[instrument(skip_all, fields(count = self.count))]
    pub fn multiply(&mut self, transform: &DMat4) -> Result<()> {
        let position = self.triple(["x", "y", "z"])?;
        let normal = if self.has_property("nx") {
            Some(self.triple(["nx", "ny", "nz"])?)
        } else {
            None
        };

        let width = self.record_width();
        for i in 0..self.count {
            let record = i * width;
            let p = self.read_triple(record, &position)?;
            self.write_triple(record, &position, transform.transform_point3(p))?;

            if let Some(normal) = &normal {
                let n = self.read_triple(record, normal)?;
                self.write_triple(record, normal, transform.transform_vector3(n))?;
            }
        }
        Ok(())
    }

    /// Divide `x`, `y` and `z` by `z` for every record. A zero `z` gives
    /// infinities or NaN, not an error.
    pub fn divide_position_by_z(&mut self) -> Result<()> {
        let position = self.triple(["x", "y", "z"])?;
        let width = self.record_width();
        for i in 0..self.count {
            let record = i * width;
            let p = self.read_triple(record, &position)?;
            self.write_triple(record, &position, p / p.z)?;
        }
        Ok(())
    }

    /// Integer `(x, y)` of every record, truncated toward zero, for drawing
    /// the cloud onto an image.
    pub fn pixel_coords(&self) -> Result<Vec<(i64, i64)>> {
        let (x, x_type) = self.field("x")?;
        let (y, y_type) = self.field("y")?;
        let width = self.record_width();
        (0..self.count)
            .map(|i| {
                let record = i * width;
                let px = self.read_at(record + x, x_type)?.to_f64();
                let py = self.read_at(record + y, y_type)?.to_f64();
                Ok((px as i64, py as i64))
            })
            .collect()
    }
}

impl Add for &PointCloud {
    type Output = Result<PointCloud>;

    fn add(self, other: &PointCloud) -> Self::Output {
        self.concat(other)
    }
}

/// One line per record, fields separated by single spaces.
impl fmt::Display for PointCloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        write_ascii_body(&[self.element_def()], &self.data, &mut buf).map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

//! The closed set of PLY scalar types and the conversions between their text,
//! little-endian byte and in-memory forms.
//!
//! Every other module goes through [`ScalarType`] and [`ScalarValue`] when it
//! needs a width, a parse or a rendering; nothing else matches on type names.

use std::fmt;
use std::str::FromStr;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::{PlyError, Result};

/// PLY scalar data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ScalarType {
    /// Parse a header type token. Both the classic (`uchar`) and the sized
    /// (`uint8`) spellings are accepted.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "char" | "int8" => Ok(ScalarType::I8),
            "uchar" | "uint8" => Ok(ScalarType::U8),
            "short" | "int16" => Ok(ScalarType::I16),
            "ushort" | "uint16" => Ok(ScalarType::U16),
            "int" | "int32" => Ok(ScalarType::I32),
            "uint" | "uint32" => Ok(ScalarType::U32),
            "float" | "float32" => Ok(ScalarType::F32),
            "double" | "float64" => Ok(ScalarType::F64),
            _ => Err(PlyError::UnsupportedFormat(format!(
                "Unknown scalar type: {s}"
            ))),
        }
    }

    /// The name written into headers.
    pub fn ply_name(self) -> &'static str {
        match self {
            ScalarType::I8 => "char",
            ScalarType::U8 => "uchar",
            ScalarType::I16 => "short",
            ScalarType::U16 => "ushort",
            ScalarType::I32 => "int",
            ScalarType::U32 => "uint",
            ScalarType::F32 => "float",
            ScalarType::F64 => "double",
        }
    }

    pub fn size_bytes(self) -> usize {
        match self {
            ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::F64 => 8,
        }
    }
}

impl FromStr for ScalarType {
    type Err = PlyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ply_name())
    }
}

/// A single decoded scalar, tagged with its type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
}

impl ScalarValue {
    pub fn data_type(self) -> ScalarType {
        match self {
            ScalarValue::I8(_) => ScalarType::I8,
            ScalarValue::U8(_) => ScalarType::U8,
            ScalarValue::I16(_) => ScalarType::I16,
            ScalarValue::U16(_) => ScalarType::U16,
            ScalarValue::I32(_) => ScalarType::I32,
            ScalarValue::U32(_) => ScalarType::U32,
            ScalarValue::F32(_) => ScalarType::F32,
            ScalarValue::F64(_) => ScalarType::F64,
        }
    }

    /// Parse an ASCII token as `data_type`.
    pub fn parse(token: &str, data_type: ScalarType) -> Result<Self> {
        let invalid = || PlyError::InvalidValue {
            token: token.to_string(),
            data_type,
        };
        let value = match data_type {
            ScalarType::I8 => ScalarValue::I8(token.parse().map_err(|_| invalid())?),
            ScalarType::U8 => ScalarValue::U8(token.parse().map_err(|_| invalid())?),
            ScalarType::I16 => ScalarValue::I16(token.parse().map_err(|_| invalid())?),
            ScalarType::U16 => ScalarValue::U16(token.parse().map_err(|_| invalid())?),
            ScalarType::I32 => ScalarValue::I32(token.parse().map_err(|_| invalid())?),
            ScalarType::U32 => ScalarValue::U32(token.parse().map_err(|_| invalid())?),
            ScalarType::F32 => ScalarValue::F32(token.parse().map_err(|_| invalid())?),
            ScalarType::F64 => ScalarValue::F64(token.parse().map_err(|_| invalid())?),
        };
        Ok(value)
    }

    /// Decode a little-endian value at `offset`. `None` if the buffer is too short.
    pub fn read_le(buf: &[u8], offset: usize, data_type: ScalarType) -> Option<Self> {
        let bytes = buf.get(offset..offset.checked_add(data_type.size_bytes())?)?;
        Some(match data_type {
            ScalarType::I8 => ScalarValue::I8(bytes[0] as i8),
            ScalarType::U8 => ScalarValue::U8(bytes[0]),
            ScalarType::I16 => ScalarValue::I16(LittleEndian::read_i16(bytes)),
            ScalarType::U16 => ScalarValue::U16(LittleEndian::read_u16(bytes)),
            ScalarType::I32 => ScalarValue::I32(LittleEndian::read_i32(bytes)),
            ScalarType::U32 => ScalarValue::U32(LittleEndian::read_u32(bytes)),
            ScalarType::F32 => ScalarValue::F32(LittleEndian::read_f32(bytes)),
            ScalarType::F64 => ScalarValue::F64(LittleEndian::read_f64(bytes)),
        })
    }

    /// Encode little-endian at `offset`, in place. `None` if the buffer is too short.
    pub fn write_le(self, buf: &mut [u8], offset: usize) -> Option<()> {
        let width = self.data_type().size_bytes();
        let bytes = buf.get_mut(offset..offset.checked_add(width)?)?;
        match self {
            ScalarValue::I8(v) => bytes[0] = v as u8,
            ScalarValue::U8(v) => bytes[0] = v,
            ScalarValue::I16(v) => LittleEndian::write_i16(bytes, v),
            ScalarValue::U16(v) => LittleEndian::write_u16(bytes, v),
            ScalarValue::I32(v) => LittleEndian::write_i32(bytes, v),
            ScalarValue::U32(v) => LittleEndian::write_u32(bytes, v),
            ScalarValue::F32(v) => LittleEndian::write_f32(bytes, v),
            ScalarValue::F64(v) => LittleEndian::write_f64(bytes, v),
        }
        Some(())
    }

    pub fn to_f64(self) -> f64 {
        match self {
            ScalarValue::I8(v) => v as f64,
            ScalarValue::U8(v) => v as f64,
            ScalarValue::I16(v) => v as f64,
            ScalarValue::U16(v) => v as f64,
            ScalarValue::I32(v) => v as f64,
            ScalarValue::U32(v) => v as f64,
            ScalarValue::F32(v) => v as f64,
            ScalarValue::F64(v) => v,
        }
    }

    /// Convert `value` to `data_type`. Integer targets saturate, NaN becomes 0.
    pub fn from_f64(value: f64, data_type: ScalarType) -> Self {
        match data_type {
            ScalarType::I8 => ScalarValue::I8(value as i8),
            ScalarType::U8 => ScalarValue::U8(value as u8),
            ScalarType::I16 => ScalarValue::I16(value as i16),
            ScalarType::U16 => ScalarValue::U16(value as u16),
            ScalarType::I32 => ScalarValue::I32(value as i32),
            ScalarType::U32 => ScalarValue::U32(value as u32),
            ScalarType::F32 => ScalarValue::F32(value as f32),
            ScalarType::F64 => ScalarValue::F64(value),
        }
    }

    pub fn cast(self, data_type: ScalarType) -> Self {
        if self.data_type() == data_type {
            self
        } else {
            Self::from_f64(self.to_f64(), data_type)
        }
    }

    /// Interpret a list count. Fails on negative or fractional counts.
    pub(crate) fn to_count(self) -> Option<usize> {
        let v = self.to_f64();
        if v >= 0.0 && v.fract() == 0.0 && v <= usize::MAX as f64 {
            Some(v as usize)
        } else {
            None
        }
    }
}

fn fmt_float<T: Copy + fmt::Display + Into<f64>>(f: &mut fmt::Formatter<'_>, v: T) -> fmt::Result {
    let wide: f64 = v.into();
    if wide.is_nan() {
        f.write_str("NaN")
    } else if wide.is_infinite() {
        f.write_str(if wide > 0.0 { "Inf" } else { "-Inf" })
    } else {
        write!(f, "{v}")
    }
}

// Floats render as the shortest decimal that reads back to the same bits.
impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ScalarValue::I8(v) => write!(f, "{v}"),
            ScalarValue::U8(v) => write!(f, "{v}"),
            ScalarValue::I16(v) => write!(f, "{v}"),
            ScalarValue::U16(v) => write!(f, "{v}"),
            ScalarValue::I32(v) => write!(f, "{v}"),
            ScalarValue::U32(v) => write!(f, "{v}"),
            ScalarValue::F32(v) => fmt_float(f, v),
            ScalarValue::F64(v) => fmt_float(f, v),
        }
    }
}

macro_rules! impl_from_native {
    ($($native:ty => $variant:ident),*) => {
        $(
            impl From<$native> for ScalarValue {
                fn from(v: $native) -> Self {
                    ScalarValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_native!(i8 => I8, u8 => U8, i16 => I16, u16 => U16, i32 => I32, u32 => U32, f32 => F32, f64 => F64);

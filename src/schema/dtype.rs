//! Element types carried by `NdArray` messages.
//!
//! `DataType` is the single table mapping wire enum values to element widths.
//! Every other module (converter, validator, protobuf codec) asks this table and
//! never hard-codes a width.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Element type of an `NdArray`, with the wire enum values as discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(i32)]
pub enum DataType {
    Float32 = 0,
    Float64 = 1,
    Int64 = 2,
    Int32 = 3,
    Uint8 = 4,
}

/// All supported data types, in wire enum order.
pub const ALL_DATA_TYPES: [DataType; 5] = [
    DataType::Float32,
    DataType::Float64,
    DataType::Int64,
    DataType::Int32,
    DataType::Uint8,
];

impl DataType {
    /// Byte width of one element.
    pub const fn element_size(self) -> usize {
        match self {
            DataType::Float32 => 4,
            DataType::Float64 => 8,
            DataType::Int64 => 8,
            DataType::Int32 => 4,
            DataType::Uint8 => 1,
        }
    }

    /// Returns the schema name of the type (e.g. `FLOAT32`).
    pub const fn name(self) -> &'static str {
        match self {
            DataType::Float32 => "FLOAT32",
            DataType::Float64 => "FLOAT64",
            DataType::Int64 => "INT64",
            DataType::Int32 => "INT32",
            DataType::Uint8 => "UINT8",
        }
    }

    /// Returns the wire enum value.
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Looks up a wire enum value. Returns None for values outside the table.
    pub fn from_i32(value: i32) -> Option<DataType> {
        match value {
            0 => Some(DataType::Float32),
            1 => Some(DataType::Float64),
            2 => Some(DataType::Int64),
            3 => Some(DataType::Int32),
            4 => Some(DataType::Uint8),
            _ => None,
        }
    }
}

impl TryFrom<i32> for DataType {
    type Error = ConvertError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        DataType::from_i32(value).ok_or(ConvertError::UnsupportedDType(value))
    }
}

impl From<DataType> for i32 {
    fn from(dtype: DataType) -> i32 {
        dtype.as_i32()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Rust scalar that can be stored in an `NdArray`.
///
/// Implemented for `f32`, `f64`, `i64`, `i32` and `u8`. Bytes are always
/// little-endian on the wire.
pub trait Element: bytemuck::Pod + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// The data type this scalar is stored as.
    const DTYPE: DataType;

    /// Decodes one element from exactly `DTYPE.element_size()` bytes.
    fn read_le(bytes: &[u8]) -> Self;

    /// Appends the little-endian encoding of `values` to `out`.
    fn extend_le(values: &[Self], out: &mut Vec<u8>);
}

macro_rules! impl_element {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DataType = $dtype;

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_le_bytes(buf)
            }

            fn extend_le(values: &[Self], out: &mut Vec<u8>) {
                if cfg!(target_endian = "little") {
                    out.extend_from_slice(bytemuck::cast_slice(values));
                } else {
                    out.reserve(values.len() * std::mem::size_of::<$ty>());
                    for v in values {
                        out.extend_from_slice(&v.to_le_bytes());
                    }
                }
            }
        }
    };
}

impl_element!(f32, DataType::Float32);
impl_element!(f64, DataType::Float64);
impl_element!(i64, DataType::Int64);
impl_element!(i32, DataType::Int32);
impl_element!(u8, DataType::Uint8);

//! The `NDArray` message: raw bytes plus dtype and shape.

use bytes::Bytes;
use ndarray::{ArrayBase, Data, Dimension};

use crate::error::ConvertError;

use super::dtype::{DataType, Element};

/// An N-dimensional array as it travels between processes.
///
/// This is the protobuf `NDArray` message (see [`crate::schema::wire`]).
/// The message is value-like: it does not check that `raw_data` agrees with
/// `shape` and `dtype`. That check happens when a view is built (see
/// [`crate::convert::to_view`]). `dtype` holds the raw wire enum value so
/// that unknown values survive decoding and fail later with
/// `UnsupportedDType`.
#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct NdArray {
    #[prost(int32, tag = "1")]
    pub dtype: i32,
    #[prost(uint64, repeated, tag = "2")]
    pub shape: Vec<u64>,
    #[prost(bytes = "bytes", tag = "3")]
    pub raw_data: Bytes,
}

impl NdArray {
    /// Creates a message from already encoded little-endian bytes.
    pub fn new(dtype: DataType, shape: Vec<u64>, raw_data: impl Into<Bytes>) -> Self {
        NdArray {
            dtype: dtype.as_i32(),
            shape,
            raw_data: raw_data.into(),
        }
    }

    /// Encodes a flat row-major buffer of `T` under the given shape.
    pub fn from_vec<T: Element>(shape: Vec<u64>, data: Vec<T>) -> Self {
        let mut raw = Vec::with_capacity(data.len() * T::DTYPE.element_size());
        T::extend_le(&data, &mut raw);
        NdArray::new(T::DTYPE, shape, raw)
    }

    /// Encodes an `ndarray` array, walking it in logical (row-major) order.
    pub fn from_array<T, S, D>(array: &ArrayBase<S, D>) -> Self
    where
        T: Element,
        S: Data<Elem = T>,
        D: Dimension,
    {
        let shape = array.shape().iter().map(|&d| d as u64).collect();
        let mut raw = Vec::with_capacity(array.len() * T::DTYPE.element_size());
        match array.as_slice() {
            Some(slice) => T::extend_le(slice, &mut raw),
            None => {
                let flat: Vec<T> = array.iter().copied().collect();
                T::extend_le(&flat, &mut raw);
            }
        }
        NdArray::new(T::DTYPE, shape, raw)
    }

    /// Resolves the dtype against the schema table.
    pub fn data_type(&self) -> Result<DataType, ConvertError> {
        DataType::try_from(self.dtype)
    }

    /// Product of the shape. Rank 0 counts as a single scalar. None on
    /// overflow; any zero dimension makes the product zero.
    pub fn num_elements(&self) -> Option<u64> {
        if self.shape.contains(&0) {
            return Some(0);
        }
        self.shape.iter().try_fold(1u64, |acc, &d| acc.checked_mul(d))
    }

    /// Byte length `raw_data` must have for the declared dtype and shape.
    pub fn expected_byte_len(&self) -> Result<u64, ConvertError> {
        let dtype = self.data_type()?;
        self.num_elements()
            .and_then(|n| n.checked_mul(dtype.element_size() as u64))
            .ok_or_else(|| ConvertError::ShapeOverflow {
                shape: self.shape.clone(),
            })
    }

    /// Number of bytes in `raw_data`.
    pub fn nbytes(&self) -> usize {
        self.raw_data.len()
    }

    /// True when no payload bytes are attached.
    pub fn is_empty(&self) -> bool {
        self.raw_data.is_empty()
    }
}

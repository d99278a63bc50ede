//! Typed views over `NdArray` byte buffers.
//!
//! A view either borrows the message's bytes (`TensorView::Borrowed`,
//! read-only, no allocation) or owns a private copy (`TensorView::Owned`,
//! writable). When the bytes cannot be reinterpreted in place, a read-only
//! view holds a decoded copy instead (`TensorView::Decoded`). The borrow ties
//! the view to `&NdArray`, so the message cannot be dropped or modified while
//! a borrowed view is alive:
//!
//! ```compile_fail
//! use nifty_common::convert::to_view;
//! use nifty_common::schema::NdArray;
//!
//! let msg = NdArray::from_vec(vec![2], vec![1.0f32, 2.0]);
//! let view = to_view::<f32>(&msg, false).unwrap();
//! drop(msg);
//! println!("{:?}", view.view());
//! ```

use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, IxDyn};

use crate::error::ConvertError;
use crate::schema::{DataType, Element, NdArray};

/// A shaped, typed view of an `NdArray`.
#[derive(Debug, Clone)]
pub enum TensorView<'a, T> {
    /// Aliases the message's `raw_data`. Never writable.
    Borrowed(ArrayViewD<'a, T>),
    /// Read-only copy decoded from misaligned or big-endian bytes.
    Decoded(ArrayD<T>),
    /// Owns freshly allocated memory. Always writable.
    Owned(ArrayD<T>),
}

impl<'a, T: Element> TensorView<'a, T> {
    pub fn is_borrowed(&self) -> bool {
        matches!(self, TensorView::Borrowed(_))
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, TensorView::Owned(_))
    }

    /// Read-only access regardless of variant.
    pub fn view(&self) -> ArrayViewD<'_, T> {
        match self {
            TensorView::Borrowed(v) => v.view(),
            TensorView::Decoded(a) | TensorView::Owned(a) => a.view(),
        }
    }

    /// Mutable access. None unless the view is writable.
    pub fn view_mut(&mut self) -> Option<ArrayViewMutD<'_, T>> {
        match self {
            TensorView::Borrowed(_) | TensorView::Decoded(_) => None,
            TensorView::Owned(a) => Some(a.view_mut()),
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            TensorView::Borrowed(v) => v.shape(),
            TensorView::Decoded(a) | TensorView::Owned(a) => a.shape(),
        }
    }

    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pointer to the first element.
    pub fn as_ptr(&self) -> *const T {
        match self {
            TensorView::Borrowed(v) => v.as_ptr(),
            TensorView::Decoded(a) | TensorView::Owned(a) => a.as_ptr(),
        }
    }

    /// Returns a writable view, copying only if this one is borrowed.
    pub fn into_writable(self) -> TensorView<'a, T> {
        match self {
            TensorView::Borrowed(v) => {
                tracing::debug!(
                    dtype = %T::DTYPE,
                    shape = ?v.shape(),
                    "copying borrowed buffer for writable view"
                );
                TensorView::Owned(v.into_owned())
            }
            TensorView::Decoded(a) => TensorView::Owned(a),
            owned @ TensorView::Owned(_) => owned,
        }
    }

    /// Converts into an owned array, copying only if this view is borrowed.
    pub fn into_owned(self) -> ArrayD<T> {
        match self {
            TensorView::Borrowed(v) => v.into_owned(),
            TensorView::Decoded(a) | TensorView::Owned(a) => a,
        }
    }
}

/// Builds a typed view of `array`.
///
/// With `writable == false` the result borrows `raw_data` without copying.
/// With `writable == true` the result is always `Owned`: message buffers are
/// shared and immutable, so a private copy is made.
///
/// Fails with `UnsupportedDType` for unknown dtype values, `DTypeMismatch`
/// when `T` is not the array's element type and `ShapeMismatch` when the
/// buffer length disagrees with shape and dtype.
///
/// Bytes are little-endian. On big-endian hosts, or when `raw_data` is not
/// aligned for `T`, elements are decoded into a `Decoded` array instead. It
/// stays read-only unless `writable` was requested.
pub fn to_view<T: Element>(array: &NdArray, writable: bool) -> Result<TensorView<'_, T>, ConvertError> {
    let dtype = array.data_type()?;
    if dtype != T::DTYPE {
        return Err(ConvertError::DTypeMismatch {
            expected: dtype,
            requested: T::DTYPE,
        });
    }
    let dims = checked_dims(array, dtype)?;

    let view = match cast_elements::<T>(&array.raw_data) {
        Some(elems) => TensorView::Borrowed(ArrayViewD::from_shape(IxDyn(&dims), elems)?),
        None => {
            tracing::debug!(
                dtype = %dtype,
                shape = ?array.shape,
                "zero-copy view unavailable, decoding into an owned array"
            );
            let elems: Vec<T> = array
                .raw_data
                .chunks_exact(dtype.element_size())
                .map(T::read_le)
                .collect();
            TensorView::Decoded(ArrayD::from_shape_vec(IxDyn(&dims), elems)?)
        }
    };

    Ok(if writable { view.into_writable() } else { view })
}

/// Checks the byte length against shape and dtype and returns the dims.
fn checked_dims(array: &NdArray, dtype: DataType) -> Result<Vec<usize>, ConvertError> {
    let expected = array.expected_byte_len()?;
    let actual = array.raw_data.len() as u64;
    if expected != actual {
        return Err(ConvertError::ShapeMismatch {
            shape: array.shape.clone(),
            dtype,
            expected,
            actual,
        });
    }
    array
        .shape
        .iter()
        .map(|&d| usize::try_from(d))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConvertError::ShapeOverflow {
            shape: array.shape.clone(),
        })
}

/// Reinterprets little-endian bytes in place, if the host allows it.
fn cast_elements<T: Element>(bytes: &[u8]) -> Option<&[T]> {
    if cfg!(target_endian = "big") {
        return None;
    }
    if bytes.is_empty() {
        return Some(&[]);
    }
    bytemuck::try_cast_slice(bytes).ok()
}

/// A view whose element type is only known at runtime.
#[derive(Debug, Clone)]
pub enum DynView<'a> {
    Float32(TensorView<'a, f32>),
    Float64(TensorView<'a, f64>),
    Int64(TensorView<'a, i64>),
    Int32(TensorView<'a, i32>),
    Uint8(TensorView<'a, u8>),
}

macro_rules! dispatch {
    ($value:expr, $v:ident => $body:expr) => {
        match $value {
            DynView::Float32($v) => $body,
            DynView::Float64($v) => $body,
            DynView::Int64($v) => $body,
            DynView::Int32($v) => $body,
            DynView::Uint8($v) => $body,
        }
    };
}

impl<'a> DynView<'a> {
    pub fn dtype(&self) -> DataType {
        match self {
            DynView::Float32(_) => DataType::Float32,
            DynView::Float64(_) => DataType::Float64,
            DynView::Int64(_) => DataType::Int64,
            DynView::Int32(_) => DataType::Int32,
            DynView::Uint8(_) => DataType::Uint8,
        }
    }

    pub fn shape(&self) -> &[usize] {
        dispatch!(self, v => v.shape())
    }

    pub fn is_borrowed(&self) -> bool {
        dispatch!(self, v => v.is_borrowed())
    }

    pub fn is_writable(&self) -> bool {
        dispatch!(self, v => v.is_writable())
    }

    /// Returns a writable view, copying only if this one is borrowed.
    pub fn into_writable(self) -> DynView<'a> {
        match self {
            DynView::Float32(v) => DynView::Float32(v.into_writable()),
            DynView::Float64(v) => DynView::Float64(v.into_writable()),
            DynView::Int64(v) => DynView::Int64(v.into_writable()),
            DynView::Int32(v) => DynView::Int32(v.into_writable()),
            DynView::Uint8(v) => DynView::Uint8(v.into_writable()),
        }
    }

    /// The typed view, if `T` is the element type.
    pub fn typed<T: DynElement>(&self) -> Option<&TensorView<'a, T>> {
        T::peek(self)
    }

    /// Mutable typed view, if `T` is the element type.
    pub fn typed_mut<T: DynElement>(&mut self) -> Option<&mut TensorView<'a, T>> {
        T::peek_mut(self)
    }
}

/// Element types that have a `DynView` variant.
pub trait DynElement: Element {
    fn wrap(view: TensorView<'_, Self>) -> DynView<'_>;
    fn peek<'b, 'a>(view: &'b DynView<'a>) -> Option<&'b TensorView<'a, Self>>;
    fn peek_mut<'b, 'a>(view: &'b mut DynView<'a>) -> Option<&'b mut TensorView<'a, Self>>;
}

macro_rules! impl_dyn_element {
    ($ty:ty, $variant:ident) => {
        impl DynElement for $ty {
            fn wrap(view: TensorView<'_, Self>) -> DynView<'_> {
                DynView::$variant(view)
            }

            fn peek<'b, 'a>(view: &'b DynView<'a>) -> Option<&'b TensorView<'a, Self>> {
                match view {
                    DynView::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn peek_mut<'b, 'a>(view: &'b mut DynView<'a>) -> Option<&'b mut TensorView<'a, Self>> {
                match view {
                    DynView::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_dyn_element!(f32, Float32);
impl_dyn_element!(f64, Float64);
impl_dyn_element!(i64, Int64);
impl_dyn_element!(i32, Int32);
impl_dyn_element!(u8, Uint8);

/// Builds a view of `array` with the element type picked from its dtype.
///
/// Same semantics as [`to_view`] without the `DTypeMismatch` case.
pub fn to_dyn_view(array: &NdArray, writable: bool) -> Result<DynView<'_>, ConvertError> {
    match array.data_type()? {
        DataType::Float32 => to_view::<f32>(array, writable).map(f32::wrap),
        DataType::Float64 => to_view::<f64>(array, writable).map(f64::wrap),
        DataType::Int64 => to_view::<i64>(array, writable).map(i64::wrap),
        DataType::Int32 => to_view::<i32>(array, writable).map(i32::wrap),
        DataType::Uint8 => to_view::<u8>(array, writable).map(u8::wrap),
    }
}

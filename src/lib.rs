//! nifty-common: zero-copy NDArray interchange.
//!
//! Messages (`NdArray`, `BoardState`) carry raw little-endian bytes plus
//! dtype and shape metadata. The converter turns them into typed `ndarray`
//! views without copying, the validator checks graph shapes against
//! `GraphConstants`, and the graph adapter assembles a node/edge aggregate.
//!
//! ```
//! use nifty_common::convert::to_view;
//! use nifty_common::schema::NdArray;
//!
//! let msg = NdArray::from_vec(vec![2, 2], vec![1.0f32, 2.0, 3.0, 4.0]);
//! let view = to_view::<f32>(&msg, false)?;
//! assert_eq!(view.shape(), &[2, 2]);
//! assert!(!view.is_writable());
//! # Ok::<(), nifty_common::Error>(())
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod schema;
pub mod validate;

pub use convert::{to_dyn_view, to_graph, to_view, DynView, GraphData, TensorView};
pub use error::{ConvertError, Error, Result, ValidationError};
pub use schema::{BoardState, DataType, Element, GraphConstants, NdArray};
pub use validate::{validate_board_state, validate_with};

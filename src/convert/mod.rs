//! Conversion from messages to typed views and graph aggregates.
//!
//! `to_view` / `to_dyn_view` reinterpret an `NdArray` buffer as a shaped
//! array, zero-copy by default. `to_graph` maps a whole `BoardState` onto a
//! `GraphData` aggregate.

pub mod graph;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod view;

pub use graph::{to_graph, GraphData, CORE_FIELDS};
pub use view::{to_dyn_view, to_view, DynElement, DynView, TensorView};

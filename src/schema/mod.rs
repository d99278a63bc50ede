//! Message types shared by producers and consumers.
//!
//! Holds the dtype table, the `NdArray` and `BoardState` messages, the graph
//! schema constants and their protobuf encoding.

pub mod array;
pub mod board;
pub mod dtype;
pub mod wire;

pub use array::NdArray;
pub use board::{BoardState, GraphConstants};
pub use dtype::{DataType, Element, ALL_DATA_TYPES};
pub use wire::{
    decode_board_state, decode_ndarray, encode_board_state, encode_ndarray, WireError,
};

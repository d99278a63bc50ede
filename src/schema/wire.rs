//! Protobuf encoding of `NdArray` and `BoardState`.
//!
//! The messages are declared with `prost` derives on the schema structs; the
//! field numbers are written out in `proto/nifty_common.proto` for producers
//! in other languages. `dtype` travels as the `DataType` enum value, `shape`
//! as packed `uint64`, `raw_data` as `bytes` and `auxiliary_data` as a
//! `map<string, NDArray>`.
//!
//! Decoding from `Bytes` slices `raw_data` out of the input buffer without
//! copying. Protobuf gives no alignment guarantee for those slices, so views
//! over them may fall back to a decoded copy. The codec does not check raw
//! data against dtype and shape; views do that.

use bytes::Bytes;
use prost::Message;

use super::array::NdArray;
use super::board::BoardState;

/// Upper bound on array rank, enforced on both encode and decode.
pub const MAX_RANK: usize = 64;

/// Largest message protobuf implementations accept (2 GiB - 1).
pub const MAX_MESSAGE_LEN: usize = i32::MAX as usize;

/// Errors that can occur while encoding or decoding a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("malformed protobuf message: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("array '{field}' has rank {rank}, limit is {MAX_RANK}")]
    RankTooLarge { field: String, rank: usize },

    #[error("encoded message would be {0} bytes, limit is {MAX_MESSAGE_LEN}")]
    MessageTooLarge(usize),
}

/// Encodes a single `NDArray` message.
pub fn encode_ndarray(array: &NdArray) -> Result<Bytes, WireError> {
    check_rank("ndarray", array)?;
    encode(array)
}

/// Decodes a single `NDArray` message.
pub fn decode_ndarray(buf: Bytes) -> Result<NdArray, WireError> {
    let array = NdArray::decode(buf)?;
    check_rank("ndarray", &array)?;
    Ok(array)
}

/// Encodes a `BoardState` message. Auxiliary entries are written in key
/// order, so equal states encode to equal bytes.
pub fn encode_board_state(state: &BoardState) -> Result<Bytes, WireError> {
    check_board(state)?;
    encode(state)
}

/// Decodes a `BoardState` message.
pub fn decode_board_state(buf: Bytes) -> Result<BoardState, WireError> {
    let len = buf.len();
    let state = BoardState::decode(buf)?;
    check_board(&state)?;
    tracing::debug!(
        bytes = len,
        version = %state.version,
        creator_id = %state.creator_id,
        aux = state.auxiliary_data.len(),
        "decoded board state"
    );
    Ok(state)
}

fn encode<M: Message>(msg: &M) -> Result<Bytes, WireError> {
    let len = msg.encoded_len();
    if len > MAX_MESSAGE_LEN {
        return Err(WireError::MessageTooLarge(len));
    }
    Ok(Bytes::from(msg.encode_to_vec()))
}

fn check_rank(field: &str, array: &NdArray) -> Result<(), WireError> {
    let rank = array.shape.len();
    if rank > MAX_RANK {
        return Err(WireError::RankTooLarge {
            field: field.to_string(),
            rank,
        });
    }
    Ok(())
}

fn check_board(state: &BoardState) -> Result<(), WireError> {
    check_rank("nodes", &state.nodes)?;
    check_rank("edge_index", &state.edge_index)?;
    check_rank("edge_attributes", &state.edge_attributes)?;
    for (key, array) in &state.auxiliary_data {
        check_rank(key, array)?;
    }
    Ok(())
}

//! The `BoardState` graph message and its schema constants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::array::NdArray;

/// Expected feature-column counts for `nodes` and `edge_attributes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConstants {
    pub num_node_features: u64,
    pub num_edge_features: u64,
}

impl GraphConstants {
    /// Node columns: node id, kind, packet, hops.
    pub const NUM_NODE_FEATURES: u64 = 4;

    /// Edge columns: capacity, congestion.
    pub const NUM_EDGE_FEATURES: u64 = 2;

    /// The constants fixed by the schema.
    pub const SCHEMA: GraphConstants = GraphConstants {
        num_node_features: Self::NUM_NODE_FEATURES,
        num_edge_features: Self::NUM_EDGE_FEATURES,
    };
}

impl Default for GraphConstants {
    fn default() -> Self {
        GraphConstants::SCHEMA
    }
}

/// A graph snapshot: node features, edge list, edge features and named
/// auxiliary tensors.
///
/// This is the protobuf `BoardState` message. The array fields are always
/// present; a producer that leaves one out decodes as an empty `NdArray`.
#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct BoardState {
    #[prost(string, tag = "1")]
    pub version: String,
    #[prost(string, tag = "2")]
    pub creator_id: String,
    /// `[N, NUM_NODE_FEATURES]`.
    #[prost(message, required, tag = "3")]
    pub nodes: NdArray,
    /// Integer `[2, E]`: source row, destination row.
    #[prost(message, required, tag = "4")]
    pub edge_index: NdArray,
    /// `[E, NUM_EDGE_FEATURES]`, or empty when edges carry no attributes.
    #[prost(message, required, tag = "5")]
    pub edge_attributes: NdArray,
    /// Kept sorted so encoding is deterministic.
    #[prost(btree_map = "string, message", tag = "6")]
    pub auxiliary_data: BTreeMap<String, NdArray>,
}

impl BoardState {
    /// Creates an empty state with the given version and creator.
    pub fn new(version: impl Into<String>, creator_id: impl Into<String>) -> Self {
        BoardState {
            version: version.into(),
            creator_id: creator_id.into(),
            ..Default::default()
        }
    }

    /// Edge attributes, or None when the message carries no attribute bytes.
    pub fn edge_attributes(&self) -> Option<&NdArray> {
        if self.edge_attributes.is_empty() {
            None
        } else {
            Some(&self.edge_attributes)
        }
    }

    /// Attaches an auxiliary tensor. Returns the previous entry for `key`.
    pub fn insert_auxiliary(&mut self, key: impl Into<String>, array: NdArray) -> Option<NdArray> {
        self.auxiliary_data.insert(key.into(), array)
    }

    /// Declared node count (`nodes.shape[0]`).
    pub fn num_nodes(&self) -> Option<u64> {
        self.nodes.shape.first().copied()
    }

    /// Declared edge count (`edge_index.shape[1]`).
    pub fn num_edges(&self) -> Option<u64> {
        self.edge_index.shape.get(1).copied()
    }
}

//! Assembles a `BoardState` into a node/edge graph aggregate.
//!
//! `GraphData` is what a downstream graph library consumes: node features
//! `x`, the `edge_index` list, optional `edge_attr` and any number of named
//! auxiliary tensors.

use std::collections::HashMap;

use crate::error::ConvertError;
use crate::schema::BoardState;

use super::view::{to_dyn_view, DynView};

/// Field names owned by the graph aggregate itself.
pub const CORE_FIELDS: [&str; 3] = ["x", "edge_index", "edge_attr"];

/// Graph-shaped views over a `BoardState`.
#[derive(Debug, Clone)]
pub struct GraphData<'a> {
    pub x: DynView<'a>,
    pub edge_index: DynView<'a>,
    /// None when the state carries no edge attribute bytes.
    pub edge_attr: Option<DynView<'a>>,
    extras: HashMap<String, DynView<'a>>,
}

impl<'a> GraphData<'a> {
    /// Looks up a field by name.
    ///
    /// Auxiliary entries are checked first, so an auxiliary key named like a
    /// core field shadows it.
    pub fn get(&self, key: &str) -> Option<&DynView<'a>> {
        if let Some(view) = self.extras.get(key) {
            return Some(view);
        }
        match key {
            "x" => Some(&self.x),
            "edge_index" => Some(&self.edge_index),
            "edge_attr" => self.edge_attr.as_ref(),
            _ => None,
        }
    }

    /// True if `get(key)` would return a view.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Auxiliary views keyed as in the source state.
    pub fn extras(&self) -> &HashMap<String, DynView<'a>> {
        &self.extras
    }

    /// Every field name that resolves to a view, core fields first.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = vec!["x", "edge_index"];
        if self.edge_attr.is_some() {
            keys.push("edge_attr");
        }
        let mut aux: Vec<&str> = self
            .extras
            .keys()
            .map(String::as_str)
            .filter(|k| !keys.contains(k))
            .collect();
        aux.sort_unstable();
        keys.extend(aux);
        keys
    }

    /// Node count from the leading dimension of `x`.
    pub fn num_nodes(&self) -> usize {
        self.x.shape().first().copied().unwrap_or(0)
    }

    /// Edge count from the second dimension of `edge_index`.
    pub fn num_edges(&self) -> usize {
        self.edge_index.shape().get(1).copied().unwrap_or(0)
    }
}

/// Builds the graph aggregate for `state`.
///
/// Every view is writable when `writable` is set (a copy is made), otherwise
/// each borrows its array's buffer. Edge attributes with an empty buffer are
/// left out entirely rather than turned into a zero-length view.
pub fn to_graph(state: &BoardState, writable: bool) -> Result<GraphData<'_>, ConvertError> {
    let x = to_dyn_view(&state.nodes, writable)?;
    let edge_index = to_dyn_view(&state.edge_index, writable)?;

    let edge_attr = match state.edge_attributes() {
        Some(attrs) => Some(to_dyn_view(attrs, writable)?),
        None => {
            tracing::debug!("edge_attributes buffer is empty, omitting edge_attr");
            None
        }
    };

    let mut extras = HashMap::with_capacity(state.auxiliary_data.len());
    for (key, array) in &state.auxiliary_data {
        if CORE_FIELDS.contains(&key.as_str()) {
            tracing::warn!(key = %key, "auxiliary entry shadows a core graph field");
        }
        extras.insert(key.clone(), to_dyn_view(array, writable)?);
    }

    Ok(GraphData {
        x,
        edge_index,
        edge_attr,
        extras,
    })
}

/// Writable conversion, matching the default of the graph sink.
impl<'a> TryFrom<&'a BoardState> for GraphData<'a> {
    type Error = ConvertError;

    fn try_from(state: &'a BoardState) -> Result<Self, Self::Error> {
        to_graph(state, true)
    }
}

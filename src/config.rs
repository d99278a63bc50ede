//! Loading `GraphConstants` overrides from JSON.
//!
//! ```json
//! { "num_node_features": 4, "num_edge_features": 2 }
//! ```
//!
//! Missing fields keep the schema values; unknown fields are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::GraphConstants;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid graph constants JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} must be greater than zero")]
    ZeroFeatures(&'static str),
}

/// Loads constants from a JSON file.
pub fn load_constants(path: &Path) -> Result<GraphConstants, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let constants = constants_from_json(&json)?;
    tracing::debug!(
        path = %path.display(),
        num_node_features = constants.num_node_features,
        num_edge_features = constants.num_edge_features,
        "loaded graph constants"
    );
    Ok(constants)
}

/// Parses constants from a JSON string.
pub fn constants_from_json(json: &str) -> Result<GraphConstants, ConfigError> {
    let constants: GraphConstants = serde_json::from_str(json)?;
    if constants.num_node_features == 0 {
        return Err(ConfigError::ZeroFeatures("num_node_features"));
    }
    if constants.num_edge_features == 0 {
        return Err(ConfigError::ZeroFeatures("num_edge_features"));
    }
    Ok(constants)
}

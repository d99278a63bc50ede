//! Structural validation of `BoardState` shapes.
//!
//! Only shape metadata is inspected: the declared column counts of `nodes`
//! and `edge_attributes` against `GraphConstants`. Raw data length, dtype and
//! `edge_index` contents are left to the converter.

use crate::error::ValidationError;
use crate::schema::{BoardState, GraphConstants};

/// Validates `state` against the schema constants.
pub fn validate_board_state(state: &BoardState) -> Result<(), ValidationError> {
    validate_with(state, &GraphConstants::default())
}

/// Validates `state` against `constants`. Nodes are checked before edges.
pub fn validate_with(state: &BoardState, constants: &GraphConstants) -> Result<(), ValidationError> {
    let node_features = feature_dim("nodes", &state.nodes.shape)?;
    if node_features != constants.num_node_features {
        return Err(ValidationError::NodeFeatureMismatch {
            expected: constants.num_node_features,
            actual: node_features,
        });
    }

    let edge_features = feature_dim("edge_attributes", &state.edge_attributes.shape)?;
    if edge_features != constants.num_edge_features {
        return Err(ValidationError::EdgeFeatureMismatch {
            expected: constants.num_edge_features,
            actual: edge_features,
        });
    }

    Ok(())
}

/// Second dimension of a `[rows, features]` shape.
fn feature_dim(field: &'static str, shape: &[u64]) -> Result<u64, ValidationError> {
    shape
        .get(1)
        .copied()
        .ok_or(ValidationError::MissingFeatureDim {
            field,
            rank: shape.len(),
        })
}

impl BoardState {
    /// Shorthand for [`validate_board_state`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_board_state(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shaped(nodes: &[u64], edges: &[u64]) -> BoardState {
        let mut state = BoardState::default();
        state.nodes.shape = nodes.to_vec();
        state.edge_attributes.shape = edges.to_vec();
        state
    }

    #[test]
    fn compliant_shapes_pass() {
        assert_eq!(validate_board_state(&shaped(&[10, 4], &[20, 2])), Ok(()));
    }

    #[test]
    fn node_mismatch_reports_expected_and_actual() {
        assert_eq!(
            validate_board_state(&shaped(&[10, 2], &[20, 2])),
            Err(ValidationError::NodeFeatureMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn nodes_checked_before_edges() {
        // Edge attributes are left unset; the node error must win.
        let mut state = BoardState::default();
        state.nodes.shape = vec![10, 2];
        assert!(matches!(
            state.validate(),
            Err(ValidationError::NodeFeatureMismatch { .. })
        ));
    }

    #[test]
    fn edge_mismatch() {
        assert_eq!(
            validate_board_state(&shaped(&[10, 4], &[20, 3])),
            Err(ValidationError::EdgeFeatureMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn missing_feature_dim() {
        assert_eq!(
            validate_board_state(&shaped(&[10], &[20, 2])),
            Err(ValidationError::MissingFeatureDim {
                field: "nodes",
                rank: 1
            })
        );
        assert_eq!(
            validate_board_state(&shaped(&[10, 4], &[])),
            Err(ValidationError::MissingFeatureDim {
                field: "edge_attributes",
                rank: 0
            })
        );
    }

    #[test]
    fn buffer_contents_are_not_inspected() {
        // Shapes are declared with no bytes behind them.
        let state = shaped(&[10, 4], &[20, 2]);
        assert!(state.nodes.raw_data.is_empty());
        assert!(state.validate().is_ok());
    }

    #[test]
    fn custom_constants() {
        let constants = GraphConstants {
            num_node_features: 36,
            num_edge_features: 1,
        };
        assert_eq!(validate_with(&shaped(&[81, 36], &[5, 1]), &constants), Ok(()));
        assert!(validate_with(&shaped(&[81, 4], &[5, 1]), &constants).is_err());
    }
}

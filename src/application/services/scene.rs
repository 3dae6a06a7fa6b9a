//! Scene rendering service
//!
//! Turns a snapshot into its full primitive list: radial layout followed by
//! composition. Every call recomputes from scratch.

use tracing::{debug, instrument};

use crate::domain::{compose, layout, DomainResult, LayoutParams, Scene, TreeNode};

/// Service producing scenes with a fixed, validated geometry.
#[derive(Debug, Clone, Default)]
pub struct SceneService {
    params: LayoutParams,
}

impl SceneService {
    /// Create a scene service, rejecting unusable geometry.
    pub fn new(params: LayoutParams) -> DomainResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    #[instrument(level = "debug", skip_all, fields(root = %tree.name))]
    pub fn render(&self, tree: &TreeNode) -> Scene {
        let positioned = layout(tree, &self.params);
        let scene = compose(&positioned);
        debug!(
            nodes = positioned.len(),
            depth = positioned.depth(),
            primitives = scene.len(),
            "Scene rendered"
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_invalid_params_when_creating_then_error() {
        let params = LayoutParams {
            radius_base: -1.0,
            ..LayoutParams::default()
        };
        assert!(matches!(
            SceneService::new(params),
            Err(DomainError::InvalidLayout { field: "radius_base", .. })
        ));
    }

    #[test]
    fn given_tree_when_rendering_then_two_n_minus_one_primitives() {
        let tree = TreeNode::new("r", 0).with_children(vec![
            TreeNode::new("a", 1).with_children(vec![TreeNode::new("x", 0)]),
            TreeNode::new("b", 2),
        ]);
        let scene = SceneService::default().render(&tree);
        assert_eq!(scene.len(), 2 * 4 - 1);
    }
}

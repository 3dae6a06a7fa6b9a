//! Flatten a positioned tree into renderer-agnostic draw primitives.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::arena::PositionedTree;
use crate::domain::classifier::{classify, Color};
use crate::domain::entities::{NodeKey, Position3D};

/// One thing for the renderer to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DrawPrimitive {
    /// Labeled sphere
    Node {
        key: NodeKey,
        position: Position3D,
        color: Color,
        label: String,
    },
    /// Line from a parent to the node identified by `key`
    Edge {
        key: NodeKey,
        start: Position3D,
        end: Position3D,
    },
}

impl DrawPrimitive {
    pub fn key(&self) -> &NodeKey {
        match self {
            Self::Node { key, .. } | Self::Edge { key, .. } => key,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node { .. })
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge { .. })
    }

    /// Key that is unique across all primitives of a scene.
    fn slot(&self) -> (bool, &NodeKey) {
        (self.is_edge(), self.key())
    }
}

/// The complete set of primitives for one snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Scene {
    primitives: Vec<DrawPrimitive>,
}

impl Scene {
    pub fn primitives(&self) -> &[DrawPrimitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DrawPrimitive> {
        self.primitives.iter().filter(|p| p.is_node())
    }

    pub fn edges(&self) -> impl Iterator<Item = &DrawPrimitive> {
        self.primitives.iter().filter(|p| p.is_edge())
    }

    pub fn node(&self, key: &NodeKey) -> Option<&DrawPrimitive> {
        self.nodes().find(|p| p.key() == key)
    }

    pub fn edge_to(&self, key: &NodeKey) -> Option<&DrawPrimitive> {
        self.edges().find(|p| p.key() == key)
    }

    /// Keys of primitives that a renderer must add, remove or update to go
    /// from `old` to `new`.
    pub fn diff(old: &Scene, new: &Scene) -> SceneDiff {
        let before: BTreeMap<_, _> = old.primitives.iter().map(|p| (p.slot(), p)).collect();
        let after: BTreeMap<_, _> = new.primitives.iter().map(|p| (p.slot(), p)).collect();

        let mut added = BTreeSet::new();
        let mut changed = BTreeSet::new();
        let mut removed = BTreeSet::new();
        for (slot, primitive) in &after {
            match before.get(slot) {
                None => {
                    added.insert(primitive.key().clone());
                }
                Some(previous) if previous != primitive => {
                    changed.insert(primitive.key().clone());
                }
                Some(_) => {}
            }
        }
        for (slot, primitive) in &before {
            if !after.contains_key(slot) {
                removed.insert(primitive.key().clone());
            }
        }
        let changed = changed.difference(&added).cloned().collect();
        SceneDiff {
            added: added.into_iter().collect(),
            removed: removed.into_iter().collect(),
            changed,
        }
    }
}

/// Keys touched between two scenes. Node and edge of the same key are
/// reported once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneDiff {
    pub added: Vec<NodeKey>,
    pub removed: Vec<NodeKey>,
    pub changed: Vec<NodeKey>,
}

impl SceneDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Emit a node primitive for every positioned node and an edge primitive
/// for every node that has a parent, in pre-order.
///
/// A tree of `N` nodes yields `2N - 1` primitives.
pub fn compose(tree: &PositionedTree<'_>) -> Scene {
    let mut primitives = Vec::with_capacity(tree.len() * 2);
    for (_, positioned) in tree.iter() {
        primitives.push(DrawPrimitive::Node {
            key: positioned.key.clone(),
            position: positioned.position,
            color: classify(positioned.node.overlap_level),
            label: positioned.node.name.clone(),
        });
        if let Some(start) = positioned.parent_position {
            primitives.push(DrawPrimitive::Edge {
                key: positioned.key.clone(),
                start,
                end: positioned.position,
            });
        }
    }
    Scene { primitives }
}

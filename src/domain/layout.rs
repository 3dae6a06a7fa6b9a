//! Radial layout: every node fans its children out on a ring around the
//! vertical axis through itself, one fixed vertical step further down.

use std::f64::consts::PI;

use tracing::instrument;

use crate::domain::arena::{PositionedNode, PositionedTree};
use crate::domain::entities::{LayoutParams, NodeKey, Position3D, TreeNode};

/// Assign a position to every node of `root`.
///
/// The result is isomorphic to the input. Child `i` of `n` children of a
/// node at depth `level` lands at angle `2π·i/n`, at horizontal distance
/// `radius_base + level·radius_step` and `depth_step` below its parent.
/// Traversal uses an explicit stack, so arbitrarily deep snapshots cannot
/// overflow the call stack. Positions depend only on the tree's shape and
/// child order.
#[instrument(level = "debug", skip_all, fields(root = %root.name))]
pub fn layout<'a>(root: &'a TreeNode, params: &LayoutParams) -> PositionedTree<'a> {
    let mut tree = PositionedTree::new();
    let root_idx = tree.insert_node(PositionedNode {
        node: root,
        key: NodeKey::root(&root.name),
        position: params.origin,
        parent_position: None,
        depth: 0,
        parent: None,
        children: Vec::new(),
    });

    let mut stack = vec![root_idx];
    while let Some(idx) = stack.pop() {
        let Some(current) = tree.get(idx) else {
            continue;
        };
        let node = current.node;
        if node.children.is_empty() {
            continue;
        }
        let position = current.position;
        let level = current.depth;
        let key = current.key.clone();

        let count = node.children.len() as f64;
        let radius = params.radius_at(level);
        for (i, child) in node.children.iter().enumerate() {
            let angle = 2.0 * PI * i as f64 / count;
            let child_idx = tree.insert_node(PositionedNode {
                node: child,
                key: key.child(&child.name, i),
                position: Position3D::new(
                    position.x + angle.cos() * radius,
                    position.y - params.depth_step,
                    position.z + angle.sin() * radius,
                ),
                parent_position: Some(position),
                depth: level + 1,
                parent: Some(idx),
                children: Vec::new(),
            });
            stack.push(child_idx);
        }
    }

    tree
}

use generational_arena::{Arena, Index};
use std::fmt;
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{NodeKey, Position3D, TreeNode};

/// A snapshot node together with its computed place in the scene.
#[derive(Debug, Clone)]
pub struct PositionedNode<'a> {
    /// The snapshot node this entry was laid out from
    pub node: &'a TreeNode,
    /// Stable key derived from the node's ancestry
    pub key: NodeKey,
    /// Computed position
    pub position: Position3D,
    /// Position of the parent, None for the root
    pub parent_position: Option<Position3D>,
    /// Distance from the root, 0 for the root
    pub depth: usize,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in snapshot order
    pub children: Vec<Index>,
}

impl fmt::Display for PositionedNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.node.name, self.position)
    }
}

/// Arena-based positioned tree produced by one layout pass.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Borrows the snapshot it was computed from and is discarded on the next one.
#[derive(Debug)]
pub struct PositionedTree<'a> {
    /// Arena storage for all positioned nodes
    arena: Arena<PositionedNode<'a>>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for PositionedTree<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PositionedTree<'a> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert `node` below `node.parent`, or as root when it has no parent.
    #[instrument(level = "trace", skip_all)]
    pub fn insert_node(&mut self, node: PositionedNode<'a>) -> Index {
        let parent = node.parent;
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get(&self, idx: Index) -> Option<&PositionedNode<'a>> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&PositionedNode<'a>> {
        self.root.and_then(|idx| self.get(idx))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal, children visited in snapshot order.
    pub fn iter(&self) -> TreeIterator<'_, 'a> {
        TreeIterator::new(self)
    }

    /// Number of levels; a lone root has depth 1, an empty tree 0.
    pub fn depth(&self) -> usize {
        self.iter()
            .map(|(_, node)| node.depth + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn find(&self, key: &NodeKey) -> Option<&PositionedNode<'a>> {
        self.iter()
            .map(|(_, node)| node)
            .find(|node| &node.key == key)
    }

    /// Render the tree for terminal display with a caller-supplied label.
    pub fn to_tree_with<F>(&self, label: F) -> Tree<String>
    where
        F: Fn(&PositionedNode<'a>) -> String,
    {
        let Some(root) = self.root_node() else {
            return Tree::new("Empty tree".to_string());
        };

        fn build_tree<'a, F>(
            tree: &PositionedTree<'a>,
            node: &PositionedNode<'a>,
            label: &F,
        ) -> Tree<String>
        where
            F: Fn(&PositionedNode<'a>) -> String,
        {
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&idx| tree.get(idx))
                .map(|child| build_tree(tree, child, label))
                .collect();
            Tree::new(label(node)).with_leaves(leaves)
        }

        build_tree(self, root, &label)
    }
}

pub struct TreeIterator<'t, 'a> {
    tree: &'t PositionedTree<'a>,
    stack: Vec<Index>,
}

impl<'t, 'a> TreeIterator<'t, 'a> {
    fn new(tree: &'t PositionedTree<'a>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'t, 'a> Iterator for TreeIterator<'t, 'a> {
    type Item = (Index, &'t PositionedNode<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

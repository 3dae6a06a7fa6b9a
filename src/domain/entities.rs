//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// One node of a dendrogram snapshot.
///
/// Snapshots are immutable once built: a new snapshot replaces the old one
/// wholesale, nodes are never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Display label, not required to be unique
    pub name: String,
    /// Overlap classification code (see `OverlapLevel`)
    pub overlap_level: i64,
    /// Ordered children; the order drives the layout angle
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, overlap_level: i64) -> Self {
        Self {
            name: name.into(),
            overlap_level,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Reject trees with more than `limit` levels.
    pub fn ensure_depth(&self, limit: usize) -> DomainResult<()> {
        if self.depth() > limit {
            return Err(DomainError::TooDeep { limit });
        }
        Ok(())
    }

    /// Number of levels in this subtree; a single node has depth 1.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in &node.children {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }
}

/// A point in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance to `other` measured in the horizontal (x/z) plane.
    pub fn horizontal_distance(&self, other: &Position3D) -> f64 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Position3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Geometry of the radial layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Position of the root node
    pub origin: Position3D,
    /// Radius of the ring around the root's children
    pub radius_base: f64,
    /// Radius growth per level below the root
    pub radius_step: f64,
    /// Vertical drop from a parent to its children
    pub depth_step: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            origin: Position3D::new(0.0, 10.0, 0.0),
            radius_base: 5.0,
            radius_step: 2.0,
            depth_step: 4.0,
        }
    }
}

impl LayoutParams {
    /// Ring radius used for the children of a node at `level`.
    pub fn radius_at(&self, level: usize) -> f64 {
        self.radius_base + level as f64 * self.radius_step
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !self.origin.is_finite() {
            return Err(invalid("origin", "coordinates must be finite"));
        }
        if !self.radius_base.is_finite() || self.radius_base < 0.0 {
            return Err(invalid("radius_base", "must be finite and >= 0"));
        }
        if !self.radius_step.is_finite() || self.radius_step < 0.0 {
            return Err(invalid("radius_step", "must be finite and >= 0"));
        }
        if !self.depth_step.is_finite() || self.depth_step <= 0.0 {
            return Err(invalid("depth_step", "must be finite and > 0"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> DomainError {
    DomainError::InvalidLayout {
        field,
        reason: reason.to_string(),
    }
}

/// Stable, content-derived identity of a node within one snapshot.
///
/// Built from the path of `name#index` segments below the root, so the same
/// node keeps its key across snapshots as long as its ancestry is unchanged.
/// `\\`, `/` and `#` inside names are backslash-escaped, so distinct nodes
/// never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn root(name: &str) -> Self {
        Self(escape_segment(name))
    }

    pub fn child(&self, name: &str, index: usize) -> Self {
        Self(format!("{}/{}#{}", self.0, escape_segment(name), index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn escape_segment(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '\\' | '/' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

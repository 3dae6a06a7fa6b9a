//! Wire format of the live feed.
//!
//! A snapshot is a UTF-8 JSON object `{ name, overlapLevel, children }`,
//! nested recursively. `overlapLevel` and `children` may be absent or null.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{DomainError, TreeNode};

/// Why an inbound payload was not accepted as a snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("malformed payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("rejected payload: {0}")]
    Rejected(#[from] DomainError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNode {
    name: String,
    #[serde(default)]
    overlap_level: Option<i64>,
    #[serde(default)]
    children: Option<Vec<WireNode>>,
}

impl From<WireNode> for TreeNode {
    fn from(wire: WireNode) -> Self {
        let children = wire
            .children
            .unwrap_or_default()
            .into_iter()
            .map(TreeNode::from)
            .collect();
        TreeNode::new(wire.name, wire.overlap_level.unwrap_or_default()).with_children(children)
    }
}

/// Parse one payload into a tree of at most `max_depth` levels.
pub fn parse_snapshot(payload: &str, max_depth: usize) -> Result<TreeNode, SnapshotError> {
    let wire: WireNode = serde_json::from_str(payload)?;
    let tree = TreeNode::from(wire);
    tree.ensure_depth(max_depth)?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_nested_payload_when_parsing_then_builds_tree() {
        let payload = r#"{"name":"A","overlapLevel":3,"children":[
            {"name":"B","overlapLevel":0,"children":[]},
            {"name":"C","overlapLevel":1}
        ]}"#;

        let tree = parse_snapshot(payload, 16).expect("valid snapshot");

        assert_eq!(tree.name, "A");
        assert_eq!(tree.overlap_level, 3);
        let names: Vec<_> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert!(tree.children[1].is_leaf());
    }

    #[test]
    fn given_missing_or_null_fields_when_parsing_then_defaults() {
        let tree = parse_snapshot(r#"{"name":"x","overlapLevel":null,"children":null}"#, 4)
            .expect("valid snapshot");
        assert_eq!(tree.overlap_level, 0);
        assert!(tree.is_leaf());

        let tree = parse_snapshot(r#"{"name":"y"}"#, 4).expect("valid snapshot");
        assert_eq!(tree.overlap_level, 0);
    }

    #[test]
    fn given_unknown_fields_when_parsing_then_ignored() {
        let tree = parse_snapshot(r#"{"name":"x","overlapLevel":9,"weight":1.5}"#, 4)
            .expect("valid snapshot");
        assert_eq!(tree.overlap_level, 9);
    }

    #[rstest]
    #[case::not_json("this is not json")]
    #[case::truncated(r#"{"name":"A","children":["#)]
    #[case::missing_name(r#"{"overlapLevel":1}"#)]
    #[case::wrong_name_type(r#"{"name":5}"#)]
    #[case::wrong_level_type(r#"{"name":"A","overlapLevel":"high"}"#)]
    #[case::children_not_list(r#"{"name":"A","children":{"name":"B"}}"#)]
    #[case::array_root(r#"[{"name":"A"}]"#)]
    #[case::null_root("null")]
    fn given_malformed_payload_when_parsing_then_invalid_json(#[case] payload: &str) {
        assert!(matches!(
            parse_snapshot(payload, 16),
            Err(SnapshotError::InvalidJson(_))
        ));
    }

    #[test]
    fn given_tree_deeper_than_limit_when_parsing_then_rejected() {
        let payload = r#"{"name":"a","children":[{"name":"b","children":[{"name":"c"}]}]}"#;
        assert!(matches!(
            parse_snapshot(payload, 2),
            Err(SnapshotError::Rejected(DomainError::TooDeep { limit: 2 }))
        ));
    }
}

//! Tests for the radial layout

use std::f64::consts::PI;

use rstest::{fixture, rstest};

use dendroview::domain::{layout, LayoutParams, NodeKey, Position3D, TreeNode};

const EPS: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

#[fixture]
fn org() -> TreeNode {
    TreeNode::new("Permissions", 0).with_children(vec![
        TreeNode::new("OU=Admins", 3).with_children(vec![
            TreeNode::new("Permission-Admin-Shared", 1),
            TreeNode::new("Permission-Admin-Audit", 1),
        ]),
        TreeNode::new("OU=Finance", 2).with_children(vec![TreeNode::new(
            "Permission-OU=Finance-1",
            0,
        )]),
        TreeNode::new("OU=HR", 0),
    ])
}

#[rstest]
fn given_identical_trees_when_laid_out_twice_then_positions_match(org: TreeNode) {
    let params = LayoutParams::default();
    let copy = org.clone();

    let first: Vec<(NodeKey, Position3D)> = layout(&org, &params)
        .iter()
        .map(|(_, n)| (n.key.clone(), n.position))
        .collect();
    let second: Vec<(NodeKey, Position3D)> = layout(&copy, &params)
        .iter()
        .map(|(_, n)| (n.key.clone(), n.position))
        .collect();

    assert_eq!(first, second);
}

#[rstest]
fn given_tree_when_laid_out_then_every_child_is_one_step_below_parent(org: TreeNode) {
    let params = LayoutParams::default();
    let tree = layout(&org, &params);

    assert_eq!(tree.len(), org.node_count());
    for (_, node) in tree.iter() {
        match node.parent_position {
            Some(parent) => {
                assert_close(node.position.y, parent.y - params.depth_step);
            }
            None => assert_eq!(node.position, params.origin),
        }
    }
}

#[rstest]
fn given_tree_when_laid_out_then_children_sit_on_ring_of_their_level(org: TreeNode) {
    let params = LayoutParams::default();
    let tree = layout(&org, &params);

    for (_, node) in tree.iter() {
        if let Some(parent) = node.parent_position {
            let expected = params.radius_at(node.depth - 1);
            assert_close(node.position.horizontal_distance(&parent), expected);
        }
    }
}

#[test]
fn given_three_node_example_when_laid_out_then_b_at_zero_and_c_at_pi() {
    let root = TreeNode::new("A", 3)
        .with_children(vec![TreeNode::new("B", 0), TreeNode::new("C", 1)]);
    let params = LayoutParams::default();
    let tree = layout(&root, &params);
    let a = params.origin;

    let b = tree.find(&NodeKey::root("A").child("B", 0)).unwrap();
    let c = tree.find(&NodeKey::root("A").child("C", 1)).unwrap();

    assert_close(b.position.x, a.x + params.radius_base);
    assert_close(b.position.z, a.z);
    assert_close(c.position.x, a.x + PI.cos() * params.radius_base);
    assert_close(c.position.z, a.z + PI.sin() * params.radius_base);
    assert_close(b.position.y, a.y - params.depth_step);
    assert_close(c.position.y, a.y - params.depth_step);
}

#[test]
fn given_duplicate_sibling_names_when_laid_out_then_keys_stay_distinct() {
    let root = TreeNode::new("r", 0)
        .with_children(vec![TreeNode::new("same", 0), TreeNode::new("same", 1)]);
    let tree = layout(&root, &LayoutParams::default());

    let keys: Vec<&str> = tree.iter().map(|(_, n)| n.key.as_str()).collect();
    assert_eq!(keys, vec!["r", "r/same#0", "r/same#1"]);
}

#[test]
fn given_deep_chain_when_laid_out_then_no_stack_overflow() {
    let mut node = TreeNode::new("leaf", 0);
    for i in 0..2_000 {
        node = TreeNode::new(format!("n{i}"), 0).with_children(vec![node]);
    }
    let tree = layout(&node, &LayoutParams::default());

    assert_eq!(tree.len(), 2_001);
    assert_eq!(tree.depth(), 2_001);
}

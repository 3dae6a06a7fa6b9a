//! Demo feed: a permissions dendrogram combining several users.
//!
//! Every user contributes a private group, the shared admin group and a
//! random selection of departments. Groups are merged by name; a group
//! reached from more than one user becomes overlapping and hierarchical.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument};

use crate::domain::classifier::OverlapLevel;
use crate::domain::entities::TreeNode;

pub const ROOT_NAME: &str = "Permissions";
pub const SHARED_GROUP: &str = "OU=Admins";
pub const SHARED_PERMISSION: &str = "Permission-Admin-Shared";
/// Users of the demo feed when none are given.
pub const DEFAULT_USERS: [&str; 2] = ["User Bob", "User Alice"];
pub const DEPARTMENTS: [&str; 4] = ["OU=Finance", "OU=HR", "OU=Engineering", "OU=Product"];

#[derive(Debug, Clone)]
struct GroupDraft {
    name: String,
    overlapping: bool,
    hierarchical: bool,
    permissions: Vec<String>,
}

impl GroupDraft {
    fn new(name: impl Into<String>, overlapping: bool, hierarchical: bool) -> Self {
        Self {
            name: name.into(),
            overlapping,
            hierarchical,
            permissions: Vec::new(),
        }
    }

    fn absorb(&mut self, other: GroupDraft) {
        self.overlapping = true;
        self.hierarchical = true;
        for permission in other.permissions {
            if !self.permissions.contains(&permission) {
                self.permissions.push(permission);
            }
        }
    }

    fn into_node(self) -> TreeNode {
        let level = OverlapLevel::from_flags(self.overlapping, self.hierarchical);
        let permission_level = OverlapLevel::from_flags(self.overlapping, false);
        let children = self
            .permissions
            .into_iter()
            .map(|name| TreeNode::new(name, permission_level.code()))
            .collect();
        TreeNode::new(self.name, level.code()).with_children(children)
    }
}

fn user_groups<R: Rng>(user: &str, rng: &mut R) -> Vec<GroupDraft> {
    let mut unique = GroupDraft::new(format!("OU=UniqueGroup-{user}"), false, true);
    unique.permissions.push(format!("Permission-Unique-{user}"));

    let mut shared = GroupDraft::new(SHARED_GROUP, true, false);
    shared.permissions.push(SHARED_PERMISSION.to_string());

    let mut groups = vec![unique, shared];

    let mut departments = DEPARTMENTS;
    departments.shuffle(rng);
    let picked = rng.gen_range(2..=4);
    for department in &departments[..picked] {
        let mut group = GroupDraft::new(*department, false, false);
        for i in 0..rng.gen_range(1..=3) {
            group.permissions.push(format!("Permission-{department}-{i}"));
        }
        groups.push(group);
    }
    groups
}

/// Build the combined dendrogram for `users`.
///
/// Deterministic for a given RNG state; use a seeded RNG for reproducible feeds.
#[instrument(level = "debug", skip(rng))]
pub fn generate_dendrogram<R: Rng>(users: &[String], rng: &mut R) -> TreeNode {
    let mut merged: Vec<GroupDraft> = Vec::new();

    for user in users {
        for group in user_groups(user, rng) {
            match merged.iter_mut().find(|g| g.name == group.name) {
                Some(existing) => {
                    debug!(group = %group.name, %user, "group shared between users");
                    existing.absorb(group);
                }
                None => merged.push(group),
            }
        }
    }

    let children = merged.into_iter().map(GroupDraft::into_node).collect();
    TreeNode::new(ROOT_NAME, OverlapLevel::Base.code()).with_children(children)
}

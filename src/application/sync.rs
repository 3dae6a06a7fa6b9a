//! Connection lifecycle and snapshot intake for the live feed.
//!
//! `LiveTreeSync` is a finite state machine driven by transport events. It
//! never touches a scene: every transition returns the `SyncEvent`s a
//! rendering layer subscribes to.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::application::snapshot::parse_snapshot;
use crate::domain::TreeNode;

/// Connection status shown by the surrounding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
        };
        f.write_str(text)
    }
}

/// What the transport reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Open,
    Message(String),
    /// A frame that cannot be a snapshot (e.g. not UTF-8); carries the reason
    Undecodable(String),
    Close,
    Error(String),
}

/// What subscribers of the sync get told.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    StatusChanged(ConnectionStatus),
    /// The current tree reference was swapped for a new snapshot
    TreeReplaced(Arc<TreeNode>),
    /// The current tree was dropped on disconnect
    TreeCleared,
    /// A payload was discarded; the current tree is untouched
    SnapshotRejected(String),
    /// The transport reported an error; the connection is left to the transport
    TransportFailed(String),
}

/// What happens to the last good tree when the connection drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionPolicy {
    /// Keep showing the last good tree
    #[default]
    Retain,
    /// Forget the tree; the UI goes back to its loading state
    Clear,
}

/// Tunables of the intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    pub retention: RetentionPolicy,
    /// Snapshots with more levels are rejected
    pub max_depth: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            retention: RetentionPolicy::Retain,
            max_depth: 48,
        }
    }
}

/// Single writer of the "current tree".
///
/// Readers get an `Arc` to a complete snapshot; a replacement swaps the
/// reference and never mutates a tree a reader may hold.
#[derive(Debug, Default)]
pub struct LiveTreeSync {
    status: ConnectionStatus,
    current: Option<Arc<TreeNode>>,
    options: SyncOptions,
    accepted: u64,
    rejected: u64,
}

impl LiveTreeSync {
    pub fn new(options: SyncOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn current_tree(&self) -> Option<Arc<TreeNode>> {
        self.current.clone()
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn snapshots_accepted(&self) -> u64 {
        self.accepted
    }

    pub fn snapshots_rejected(&self) -> u64 {
        self.rejected
    }

    /// Start connecting. Only meaningful while disconnected.
    pub fn connect(&mut self) -> Vec<SyncEvent> {
        if self.status != ConnectionStatus::Disconnected {
            debug!(status = %self.status, "connect ignored");
            return Vec::new();
        }
        self.transition(ConnectionStatus::Connecting)
    }

    #[instrument(level = "debug", skip_all, fields(status = %self.status))]
    pub fn handle(&mut self, event: TransportEvent) -> Vec<SyncEvent> {
        match event {
            TransportEvent::Open => {
                info!("Connected to live feed");
                self.transition(ConnectionStatus::Connected)
            }
            TransportEvent::Message(payload) => self.accept(&payload),
            TransportEvent::Undecodable(reason) => {
                warn!(%reason, "Frame discarded");
                self.rejected += 1;
                vec![SyncEvent::SnapshotRejected(reason)]
            }
            TransportEvent::Close => self.close(),
            TransportEvent::Error(message) => {
                warn!(%message, "Transport error");
                vec![SyncEvent::TransportFailed(message)]
            }
        }
    }

    fn accept(&mut self, payload: &str) -> Vec<SyncEvent> {
        match parse_snapshot(payload, self.options.max_depth) {
            Ok(tree) => {
                debug!(root = %tree.name, nodes = tree.node_count(), "Snapshot accepted");
                let tree = Arc::new(tree);
                self.current = Some(Arc::clone(&tree));
                self.accepted += 1;
                vec![SyncEvent::TreeReplaced(tree)]
            }
            Err(e) => {
                warn!(error = %e, bytes = payload.len(), "Snapshot discarded");
                self.rejected += 1;
                vec![SyncEvent::SnapshotRejected(e.to_string())]
            }
        }
    }

    fn close(&mut self) -> Vec<SyncEvent> {
        info!("Live feed connection closed");
        let mut events = self.transition(ConnectionStatus::Disconnected);
        if self.options.retention == RetentionPolicy::Clear && self.current.take().is_some() {
            events.push(SyncEvent::TreeCleared);
        }
        events
    }

    fn transition(&mut self, next: ConnectionStatus) -> Vec<SyncEvent> {
        if self.status == next {
            return Vec::new();
        }
        debug!(from = %self.status, to = %next, "Status transition");
        self.status = next;
        vec![SyncEvent::StatusChanged(next)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"{"name":"A","overlapLevel":3,"children":[{"name":"B"}]}"#;

    fn statuses(events: &[SyncEvent]) -> Vec<ConnectionStatus> {
        events
            .iter()
            .filter_map(|e| match e {
                SyncEvent::StatusChanged(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn given_new_sync_when_created_then_disconnected_without_tree() {
        let sync = LiveTreeSync::default();
        assert_eq!(sync.status(), ConnectionStatus::Disconnected);
        assert!(sync.current_tree().is_none());
    }

    #[test]
    fn given_disconnected_when_connect_then_connecting() {
        let mut sync = LiveTreeSync::default();
        let events = sync.connect();
        assert_eq!(statuses(&events), vec![ConnectionStatus::Connecting]);
        assert!(sync.connect().is_empty(), "second connect is a no-op");
    }

    #[test]
    fn given_connecting_when_open_then_connected() {
        let mut sync = LiveTreeSync::default();
        sync.connect();
        let events = sync.handle(TransportEvent::Open);
        assert_eq!(statuses(&events), vec![ConnectionStatus::Connected]);
        assert_eq!(sync.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn given_good_message_when_handled_then_tree_replaced() {
        let mut sync = LiveTreeSync::default();
        sync.handle(TransportEvent::Open);

        let events = sync.handle(TransportEvent::Message(GOOD.to_string()));

        assert!(matches!(events.as_slice(), [SyncEvent::TreeReplaced(t)] if t.name == "A"));
        assert_eq!(sync.current_tree().map(|t| t.node_count()), Some(2));
        assert_eq!(sync.snapshots_accepted(), 1);
    }

    #[test]
    fn given_reader_holding_old_tree_when_replaced_then_old_tree_intact() {
        let mut sync = LiveTreeSync::default();
        sync.handle(TransportEvent::Message(GOOD.to_string()));
        let held = sync.current_tree().expect("tree");

        sync.handle(TransportEvent::Message(r#"{"name":"Z"}"#.to_string()));

        assert_eq!(held.name, "A");
        assert_eq!(held.children.len(), 1);
        assert_eq!(sync.current_tree().map(|t| t.name.clone()), Some("Z".to_string()));
    }

    #[test]
    fn given_bad_message_when_handled_then_tree_kept_and_rejection_reported() {
        let mut sync = LiveTreeSync::default();
        sync.handle(TransportEvent::Message(GOOD.to_string()));
        let before = sync.current_tree().expect("tree");

        let events = sync.handle(TransportEvent::Message("{not json".to_string()));

        assert!(matches!(events.as_slice(), [SyncEvent::SnapshotRejected(_)]));
        let after = sync.current_tree().expect("tree");
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(sync.snapshots_rejected(), 1);
    }

    #[test]
    fn given_undecodable_frame_when_handled_then_tree_kept_and_rejection_reported() {
        let mut sync = LiveTreeSync::default();
        sync.handle(TransportEvent::Message(GOOD.to_string()));
        let before = sync.current_tree().expect("tree");

        let events = sync.handle(TransportEvent::Undecodable("invalid UTF-8".to_string()));

        assert!(matches!(events.as_slice(), [SyncEvent::SnapshotRejected(r)] if r == "invalid UTF-8"));
        let after = sync.current_tree().expect("tree");
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(sync.snapshots_rejected(), 1);
        assert_eq!(sync.snapshots_accepted(), 1);
    }

    #[test]
    fn given_error_when_handled_then_status_unchanged() {
        let mut sync = LiveTreeSync::default();
        sync.handle(TransportEvent::Open);

        let events = sync.handle(TransportEvent::Error("reset by peer".to_string()));

        assert!(matches!(events.as_slice(), [SyncEvent::TransportFailed(m)] if m == "reset by peer"));
        assert_eq!(sync.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn given_retain_policy_when_closed_then_tree_kept() {
        let mut sync = LiveTreeSync::default();
        sync.handle(TransportEvent::Open);
        sync.handle(TransportEvent::Message(GOOD.to_string()));

        let events = sync.handle(TransportEvent::Close);

        assert_eq!(statuses(&events), vec![ConnectionStatus::Disconnected]);
        assert!(sync.current_tree().is_some());
    }

    #[test]
    fn given_clear_policy_when_closed_then_tree_dropped() {
        let mut sync = LiveTreeSync::new(SyncOptions {
            retention: RetentionPolicy::Clear,
            ..SyncOptions::default()
        });
        sync.handle(TransportEvent::Open);
        sync.handle(TransportEvent::Message(GOOD.to_string()));

        let events = sync.handle(TransportEvent::Close);

        assert!(matches!(events.last(), Some(SyncEvent::TreeCleared)));
        assert!(sync.current_tree().is_none());
    }

    #[test]
    fn given_disconnected_when_closed_again_then_no_events() {
        let mut sync = LiveTreeSync::default();
        assert!(sync.handle(TransportEvent::Close).is_empty());
    }

    #[test]
    fn given_status_when_displayed_then_readable() {
        assert_eq!(ConnectionStatus::Connecting.to_string(), "Connecting");
    }
}

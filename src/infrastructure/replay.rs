//! Replay of recorded feeds.
//!
//! A recording holds one JSON snapshot per line; blank lines are skipped.

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::sync::TransportEvent;
use crate::infrastructure::error::{InfraResult, IoResultExt};
use crate::infrastructure::traits::{EventSource, ScriptedSource};

/// Event source that plays a recording as one complete session.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    inner: ScriptedSource,
}

impl ReplaySource {
    #[instrument(level = "debug")]
    pub fn open(path: &Path) -> InfraResult<Self> {
        let content = std::fs::read_to_string(path).with_path_context("read recording", path)?;
        Ok(Self::from_lines(&content))
    }

    pub fn from_lines(content: &str) -> Self {
        let payloads: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        debug!(snapshots = payloads.len(), "Recording loaded");
        Self {
            inner: ScriptedSource::session(payloads),
        }
    }
}

impl EventSource for ReplaySource {
    fn next_event(&mut self) -> Option<TransportEvent> {
        self.inner.next_event()
    }
}

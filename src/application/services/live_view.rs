//! Live view service
//!
//! The in-process subscriber of `LiveTreeSync`: it rebuilds the scene on
//! every replaced tree and exposes what a UI shows (status text, loading
//! indicator or scene).

use tracing::{debug, instrument};

use crate::application::services::SceneService;
use crate::application::sync::{
    ConnectionStatus, LiveTreeSync, SyncEvent, SyncOptions, TransportEvent,
};
use crate::domain::{Scene, SceneDiff};
use crate::infrastructure::traits::EventSource;

pub const LOADING_TEXT: &str = "Loading dendrogram data...";

/// What the view currently displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewState<'a> {
    /// No snapshot received yet (or cleared on disconnect)
    Loading,
    Ready(&'a Scene),
}

/// Sync plus scene: feed it transport events, read back the scene.
#[derive(Debug)]
pub struct LiveView {
    sync: LiveTreeSync,
    scenes: SceneService,
    scene: Option<Scene>,
    last_diff: Option<SceneDiff>,
}

impl LiveView {
    pub fn new(scenes: SceneService, options: SyncOptions) -> Self {
        Self {
            sync: LiveTreeSync::new(options),
            scenes,
            scene: None,
            last_diff: None,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.sync.status()
    }

    pub fn status_text(&self) -> String {
        format!("Status: {}", self.sync.status())
    }

    pub fn view_state(&self) -> ViewState<'_> {
        match &self.scene {
            Some(scene) => ViewState::Ready(scene),
            None => ViewState::Loading,
        }
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Changes between the previous and the current scene.
    pub fn last_diff(&self) -> Option<&SceneDiff> {
        self.last_diff.as_ref()
    }

    pub fn sync(&self) -> &LiveTreeSync {
        &self.sync
    }

    pub fn connect(&mut self) -> Vec<SyncEvent> {
        self.sync.connect()
    }

    /// Forward `event` to the sync and apply the resulting events.
    pub fn handle(&mut self, event: TransportEvent) -> Vec<SyncEvent> {
        let events = self.sync.handle(event);
        for event in &events {
            self.apply(event);
        }
        events
    }

    fn apply(&mut self, event: &SyncEvent) {
        match event {
            SyncEvent::TreeReplaced(tree) => {
                let scene = self.scenes.render(tree);
                let diff = Scene::diff(self.scene.as_ref().unwrap_or(&Scene::default()), &scene);
                debug!(
                    added = diff.added.len(),
                    removed = diff.removed.len(),
                    changed = diff.changed.len(),
                    "Scene replaced"
                );
                self.scene = Some(scene);
                self.last_diff = Some(diff);
            }
            SyncEvent::TreeCleared => {
                self.scene = None;
                self.last_diff = None;
            }
            SyncEvent::StatusChanged(_)
            | SyncEvent::SnapshotRejected(_)
            | SyncEvent::TransportFailed(_) => {}
        }
    }

    /// Pump `source` until it is exhausted, calling `observer` after every
    /// applied event.
    #[instrument(level = "debug", skip_all)]
    pub fn run<F>(&mut self, source: &mut dyn EventSource, mut observer: F)
    where
        F: FnMut(&LiveView, &SyncEvent),
    {
        for event in self.connect() {
            observer(self, &event);
        }
        while let Some(transport_event) = source.next_event() {
            for event in self.handle(transport_event) {
                observer(self, &event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> LiveView {
        LiveView::new(SceneService::default(), SyncOptions::default())
    }

    #[test]
    fn given_no_snapshot_when_viewing_then_loading() {
        let view = view();
        assert_eq!(view.view_state(), ViewState::Loading);
        assert_eq!(view.status_text(), "Status: Disconnected");
    }

    #[test]
    fn given_snapshot_when_handled_then_scene_ready() {
        let mut view = view();
        view.handle(TransportEvent::Open);
        view.handle(TransportEvent::Message(r#"{"name":"A","children":[{"name":"B"}]}"#.into()));

        match view.view_state() {
            ViewState::Ready(scene) => assert_eq!(scene.len(), 3),
            ViewState::Loading => panic!("expected a scene"),
        }
        assert_eq!(view.last_diff().map(|d| d.added.len()), Some(2));
        assert_eq!(view.status_text(), "Status: Connected");
    }
}

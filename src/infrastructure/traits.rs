//! I/O boundary traits for testability
//!
//! The live pipeline only ever sees `TransportEvent`s; where they come from
//! (a socket, a recording, a test script) is hidden behind `EventSource`.

use std::collections::VecDeque;

use crate::application::sync::TransportEvent;

/// Producer of transport events, pulled one at a time by a single loop.
pub trait EventSource {
    /// Next event, blocking until one is available.
    /// Returns None once the source is exhausted.
    fn next_event(&mut self) -> Option<TransportEvent>;
}

/// Event source replaying a fixed script.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    events: VecDeque<TransportEvent>,
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = TransportEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// A complete session: open, one message per payload, close.
    pub fn session<I, S>(payloads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages = payloads
            .into_iter()
            .map(|p| TransportEvent::Message(p.into()));
        Self::new(
            std::iter::once(TransportEvent::Open)
                .chain(messages)
                .chain(std::iter::once(TransportEvent::Close)),
        )
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ScriptedSource {
    fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.pop_front()
    }
}

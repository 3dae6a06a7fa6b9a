//! WebSocket feed client.
//!
//! Read-only: the client never sends application messages. Each text frame
//! is handed on verbatim; the snapshot parser decides what it is worth.
//! Binary frames must be valid UTF-8, anything else is reported as undecodable.

use std::collections::VecDeque;
use std::net::TcpStream;

use tracing::{debug, info, instrument, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Error as WsError, Message, WebSocket};

use crate::application::sync::TransportEvent;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::EventSource;

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceState {
    Idle,
    Open,
    Finished,
}

/// Blocking WebSocket event source. Connects on the first pull.
pub struct WebSocketSource {
    endpoint: String,
    socket: Option<Socket>,
    state: SourceState,
    pending: VecDeque<TransportEvent>,
}

impl std::fmt::Debug for WebSocketSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketSource")
            .field("endpoint", &self.endpoint)
            .field("state", &self.state)
            .finish()
    }
}

impl WebSocketSource {
    /// Create a source for `endpoint`; only `ws://` and `wss://` are accepted.
    pub fn new(endpoint: impl Into<String>) -> InfraResult<Self> {
        let endpoint = endpoint.into();
        let rest = endpoint
            .strip_prefix("ws://")
            .or_else(|| endpoint.strip_prefix("wss://"))
            .ok_or_else(|| InfraError::Endpoint {
                endpoint: endpoint.clone(),
                message: "expected ws:// or wss:// scheme".to_string(),
            })?;
        if rest.is_empty() || rest.starts_with('/') {
            return Err(InfraError::Endpoint {
                endpoint: endpoint.clone(),
                message: "missing host".to_string(),
            });
        }
        Ok(Self {
            endpoint,
            socket: None,
            state: SourceState::Idle,
            pending: VecDeque::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(level = "debug", skip(self), fields(endpoint = %self.endpoint))]
    fn open(&mut self) -> TransportEvent {
        info!("Connecting");
        match tungstenite::connect(self.endpoint.as_str()) {
            Ok((socket, response)) => {
                debug!(status = %response.status(), "Handshake complete");
                self.socket = Some(socket);
                self.state = SourceState::Open;
                TransportEvent::Open
            }
            Err(e) => {
                warn!(error = %e, "Connection failed");
                self.fail(format!("connect {}: {}", self.endpoint, e))
            }
        }
    }

    fn read(&mut self) -> Option<TransportEvent> {
        loop {
            let frame = self.socket.as_mut()?.read();
            match frame {
                Ok(Message::Text(text)) => return Some(TransportEvent::Message(text)),
                Ok(Message::Binary(bytes)) => {
                    return Some(match String::from_utf8(bytes) {
                        Ok(text) => TransportEvent::Message(text),
                        Err(e) => {
                            warn!(error = %e, "Binary frame is not UTF-8");
                            TransportEvent::Undecodable(format!("binary frame: {}", e))
                        }
                    });
                }
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => continue,
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "Close frame received");
                    self.complete_close();
                    self.finish();
                    return Some(TransportEvent::Close);
                }
                Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => {
                    self.finish();
                    return Some(TransportEvent::Close);
                }
                Err(e) => {
                    warn!(error = %e, "Read failed");
                    return Some(self.fail(e.to_string()));
                }
            }
        }
    }

    /// Send the queued close reply and wait for the peer to drop the connection.
    fn complete_close(&mut self) {
        let Some(socket) = self.socket.as_mut() else {
            return;
        };
        if let Err(e) = socket.flush() {
            debug!(error = %e, "Close reply not sent");
            return;
        }
        loop {
            match socket.read() {
                Ok(_) => continue,
                Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => break,
                Err(e) => {
                    debug!(error = %e, "Closing handshake ended early");
                    break;
                }
            }
        }
    }

    /// Terminate with an error; the close follows on the next pull.
    fn fail(&mut self, message: String) -> TransportEvent {
        self.finish();
        self.pending.push_back(TransportEvent::Close);
        TransportEvent::Error(message)
    }

    fn finish(&mut self) {
        self.socket = None;
        self.state = SourceState::Finished;
    }
}

impl EventSource for WebSocketSource {
    fn next_event(&mut self) -> Option<TransportEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        match self.state {
            SourceState::Idle => Some(self.open()),
            SourceState::Open => self.read(),
            SourceState::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("http://localhost:8432/ws/admin")]
    #[case("localhost:8432")]
    #[case("ws://")]
    #[case("ws:///ws/admin")]
    fn given_bad_endpoint_when_creating_then_error(#[case] endpoint: &str) {
        assert!(matches!(
            WebSocketSource::new(endpoint),
            Err(InfraError::Endpoint { .. })
        ));
    }

    #[test]
    fn given_valid_endpoint_when_creating_then_idle() {
        let source = WebSocketSource::new("wss://example.org/ws/admin").unwrap();
        assert_eq!(source.endpoint(), "wss://example.org/ws/admin");
        assert_eq!(source.state, SourceState::Idle);
    }

    #[test]
    fn given_unreachable_server_when_pulling_then_error_close_then_end() {
        // bind then drop to get a port with nothing listening
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut source = WebSocketSource::new(format!("ws://127.0.0.1:{}/ws/admin", port)).unwrap();

        assert!(matches!(source.next_event(), Some(TransportEvent::Error(_))));
        assert_eq!(source.next_event(), Some(TransportEvent::Close));
        assert_eq!(source.next_event(), None);
    }

    #[test]
    fn given_server_when_pulling_then_frames_become_events() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            ws.send(Message::Text("{\"name\":\"r\"}".into())).unwrap();
            ws.send(Message::Ping(vec![1])).unwrap();
            ws.send(Message::Binary(b"{\"name\":\"s\"}".to_vec())).unwrap();
            ws.send(Message::Binary(b"{\"name\":\"A\xff\"}".to_vec())).unwrap();
            ws.close(None).unwrap();
            // the client's close reply ends the handshake cleanly
            loop {
                match ws.read() {
                    Ok(_) => continue,
                    Err(tungstenite::Error::ConnectionClosed) => return true,
                    Err(_) => return false,
                }
            }
        });

        let mut source = WebSocketSource::new(format!("ws://127.0.0.1:{}/ws/admin", port)).unwrap();
        let mut events = Vec::new();
        while let Some(event) = source.next_event() {
            events.push(event);
        }
        let clean_close = server.join().unwrap();

        assert_eq!(events.len(), 5);
        assert_eq!(events[0], TransportEvent::Open);
        assert_eq!(events[1], TransportEvent::Message("{\"name\":\"r\"}".into()));
        assert_eq!(events[2], TransportEvent::Message("{\"name\":\"s\"}".into()));
        assert!(matches!(events[3], TransportEvent::Undecodable(_)));
        assert_eq!(events[4], TransportEvent::Close);
        assert!(clean_close, "closing handshake completed by the client");
    }
}

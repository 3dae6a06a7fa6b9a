//! Infrastructure layer: event sources and I/O errors
//!
//! This layer implements the I/O boundary traits used by the application layer.

pub mod error;
pub mod replay;
pub mod traits;
pub mod websocket;

pub use error::{InfraError, InfraResult, IoResultExt};
pub use replay::ReplaySource;
pub use traits::{EventSource, ScriptedSource};
pub use websocket::WebSocketSource;

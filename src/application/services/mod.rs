//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (EventSource)
//! but are themselves concrete structs, not traits.

mod live_view;
mod scene;

pub use live_view::{LiveView, ViewState, LOADING_TEXT};
pub use scene::SceneService;

//! Domain layer: entities and the pure tree algorithms
//!
//! This layer is independent of external concerns (no I/O, no transport, no config loading).

pub mod arena;
pub mod classifier;
pub mod entities;
pub mod error;
pub mod generator;
pub mod layout;
pub mod scene;

pub use arena::{PositionedNode, PositionedTree};
pub use classifier::{classify, Color, OverlapLevel};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use generator::generate_dendrogram;
pub use layout::layout;
pub use scene::{compose, DrawPrimitive, Scene, SceneDiff};

//! dendroview: live 3D dendrogram of permission overlap
//!
//! Snapshots of a permission tree arrive over a feed; each one is laid out
//! radially in 3D and turned into a flat list of draw primitives.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

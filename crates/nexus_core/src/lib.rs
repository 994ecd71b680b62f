//! # nexus_core - Projects and persistence for Nexus
//!
//! This crate holds the parts of Nexus that carry no AI behavior:
//! - The [`Project`] data model with its invariants (progress 0-100,
//!   non-empty name, positive team size)
//! - The [`ProjectRegistry`] that owns the active set and the current project
//! - The best-effort [`Storage`] adapter over a [`KeyValueStore`]
//!
//! ```text
//! ┌─────────────────┐  projects()   ┌─────────────────┐     ┌──────────────┐
//! │ ProjectRegistry │──────────────▶│     Storage     │────▶│ KeyValueStore│
//! └─────────────────┘               └─────────────────┘     └──────────────┘
//! ```

pub mod error;
pub mod models;
pub mod registry;
pub mod storage;

pub use error::*;
pub use models::*;
pub use registry::*;
pub use storage::*;

//! SiteForge persistence layer.
//!
//! This crate owns all durable state produced by the build pipeline:
//! site rows, build rows, and the serialized bundle artifact. It exposes
//! a single capability trait, [`SiteStore`], that the orchestrator consumes;
//! concrete backends plug in without touching pipeline code.
//!
//! ## Key components
//!
//! - [`SiteStore`]: the storage capability trait (single-record CRUD)
//! - [`SurrealSiteStore`]: SurrealDB-backed implementation
//! - `fakes`: in-memory implementations for tests and local runs

mod error;
pub mod fakes;
mod migrations;
mod records;
mod surreal;
mod traits;

pub use error::StoreError;
pub use records::{BuildRecord, BuildRowStatus, BundleRecord, SiteRecord, SiteRowStatus};
pub use surreal::{SurrealConfig, SurrealSiteStore};
pub use traits::{SiteStore, StoreResult};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

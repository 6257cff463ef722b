//! Storage trait definitions for SiteForge.
//!
//! [`SiteStore`] is the only storage abstraction the build pipeline sees.
//! All methods are single-record CRUD operations keyed by site/build id.
//! In-memory fakes are provided for testing via the `fakes` module.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::records::{BuildRecord, BundleRecord, SiteRecord};

/// Result type for storage operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable storage for sites, builds, and bundle artifacts.
///
/// Guarantees:
/// - `create_*` inserts a new row and returns it as stored.
/// - `get_*` returns `StoreError::*NotFound` when the row is absent.
/// - `update_*` replaces the row wholesale (last write wins).
/// - `save_bundle` appends; `get_latest_bundle` returns the newest row
///   for a site by `created_at`.
#[async_trait]
pub trait SiteStore: Send + Sync {
    /// Insert a new site row.
    async fn create_site(&self, site: SiteRecord) -> StoreResult<SiteRecord>;

    /// Fetch a site row by id.
    async fn get_site(&self, site_id: &str) -> StoreResult<SiteRecord>;

    /// Replace a site row.
    async fn update_site(&self, site: SiteRecord) -> StoreResult<SiteRecord>;

    /// Insert a new build row.
    async fn create_build(&self, build: BuildRecord) -> StoreResult<BuildRecord>;

    /// Fetch a build row by id.
    async fn get_build(&self, build_id: &str) -> StoreResult<BuildRecord>;

    /// Replace a build row.
    async fn update_build(&self, build: BuildRecord) -> StoreResult<BuildRecord>;

    /// Append a bundle artifact row.
    async fn save_bundle(&self, bundle: BundleRecord) -> StoreResult<BundleRecord>;

    /// Fetch the bundle for an exact (site, build) pair.
    async fn get_bundle(&self, site_id: &str, build_id: &str) -> StoreResult<BundleRecord>;

    /// Fetch the newest bundle for a site.
    async fn get_latest_bundle(&self, site_id: &str) -> StoreResult<BundleRecord>;
}

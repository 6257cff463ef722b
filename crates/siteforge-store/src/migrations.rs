//! SurrealDB schema migrations and initialization.
//!
//! Sets up the `sites`, `builds`, and `bundles` tables with their
//! uniqueness constraints and lookup indexes. Safe to call multiple times
//! (idempotent).

use crate::Result;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

use crate::error::StoreError;

/// Initialize all SiteForge tables in SurrealDB.
pub async fn init_schema(db: &Surreal<Any>) -> Result<()> {
    info!("Initializing SiteForge SurrealDB schema");

    init_sites_table(db).await?;
    init_builds_table(db).await?;
    init_bundles_table(db).await?;

    info!("SiteForge schema initialization complete");
    Ok(())
}

/// Initialize `sites` table.
///
/// Constraints:
/// - `site_id` is unique
/// - `status` must be one of: "draft", "preview", "published"
///   (transitions enforced via app logic)
async fn init_sites_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing sites table");

    let sql = r#"
        DEFINE TABLE sites
            SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR select FULL
                FOR update FULL
                FOR delete NONE;

        -- Ensure site_id is unique
        DEFINE INDEX idx_site_id ON TABLE sites COLUMNS site_id UNIQUE;

        -- Index owner_id for listing a user's sites
        DEFINE INDEX idx_owner_id ON TABLE sites COLUMNS owner_id;

        -- Index business_id for reverse lookup
        DEFINE INDEX idx_business_id ON TABLE sites COLUMNS business_id;
    "#;

    db.query(sql)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(())
}

/// Initialize `builds` table.
///
/// Constraints:
/// - `build_id` is unique
/// - `status` transitions running -> completed | failed (app logic)
async fn init_builds_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing builds table");

    let sql = r#"
        DEFINE TABLE builds
            SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR select FULL
                FOR update FULL
                FOR delete NONE;

        -- Ensure build_id is unique
        DEFINE INDEX idx_build_id ON TABLE builds COLUMNS build_id UNIQUE;

        -- Index site_id for listing builds of a site
        DEFINE INDEX idx_build_site_id ON TABLE builds COLUMNS site_id;

        -- Composite index (site_id, started_at DESC) for build history
        DEFINE INDEX idx_site_started ON TABLE builds COLUMNS site_id, started_at;
    "#;

    db.query(sql)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(())
}

/// Initialize `bundles` table.
///
/// Bundle rows are append-only; the newest row per site (by `created_at`)
/// is the current artifact.
async fn init_bundles_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing bundles table");

    let sql = r#"
        DEFINE TABLE bundles
            SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR select FULL
                FOR update NONE
                FOR delete NONE;

        -- Composite unique index: one bundle row per (site, build)
        DEFINE INDEX idx_site_build ON TABLE bundles COLUMNS site_id, build_id UNIQUE;

        -- Index site_id for latest-bundle queries
        DEFINE INDEX idx_bundle_site_id ON TABLE bundles COLUMNS site_id;

        -- Composite index (site_id, created_at DESC) for fast latest lookup
        DEFINE INDEX idx_bundle_site_created ON TABLE bundles COLUMNS site_id, created_at;
    "#;

    db.query(sql)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(())
}

//! SurrealDB-backed [`SiteStore`] implementation.
//!
//! Row types from `records` are stored as-is in SCHEMALESS tables; all
//! reads go through parameterised queries (`bind` + `take`), all replaces
//! through `UPDATE ... CONTENT`.

use async_trait::async_trait;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::migrations;
use crate::records::{BuildRecord, BundleRecord, SiteRecord};
use crate::traits::{SiteStore, StoreResult};

/// Connection configuration for SurrealDB.
#[derive(Debug, Clone)]
pub struct SurrealConfig {
    /// Endpoint URL (e.g. "mem://", "surrealkv://.siteforge/db", "wss://...").
    pub endpoint: String,
    /// Namespace (default: "siteforge").
    pub namespace: String,
    /// Database name (default: "main").
    pub database: String,
}

impl SurrealConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            namespace: "siteforge".to_string(),
            database: "main".to_string(),
        }
    }

    /// Set custom namespace.
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = ns.into();
        self
    }

    /// Set custom database.
    pub fn with_database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }
}

/// SurrealDB-backed implementation of [`SiteStore`].
pub struct SurrealSiteStore {
    db: Surreal<Any>,
}

impl SurrealSiteStore {
    /// Create an in-memory instance for testing.
    ///
    /// Connects to `mem://`, selects `siteforge/main`, and runs `init_schema`.
    pub async fn in_memory() -> crate::Result<Self> {
        Self::connect(SurrealConfig::new("mem://")).await
    }

    /// Create from environment variables.
    ///
    /// Uses `SURREALDB_URL` when set; otherwise falls back to local
    /// persistence in `.siteforge/db`.
    pub async fn from_env() -> crate::Result<Self> {
        if let Ok(url) = std::env::var("SURREALDB_URL") {
            let store = Self::connect(SurrealConfig::new(url.clone())).await?;
            info!("SurrealSiteStore connected ({})", url);
            return Ok(store);
        }

        let path = ".siteforge/db";
        std::fs::create_dir_all(path).map_err(|e| {
            StoreError::Connection(format!("Failed to create database directory {path}: {e}"))
        })?;
        let url = format!("surrealkv://{path}");
        info!(
            "No SURREALDB_URL found, using local persistence: {}",
            url
        );
        Self::connect(SurrealConfig::new(url)).await
    }

    /// Connect with an explicit configuration.
    pub async fn connect(config: SurrealConfig) -> crate::Result<Self> {
        let db = surrealdb::engine::any::connect(&config.endpoint)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        migrations::init_schema(&db).await?;

        Ok(Self { db })
    }

    // -- private helpers -----------------------------------------------------

    async fn select_one<T>(&self, sql: &str, key: &str, value: String) -> StoreResult<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut res = self
            .db
            .query(sql)
            .bind((key.to_string(), value))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let rows: Vec<T> = res
            .take(0)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl SiteStore for SurrealSiteStore {
    async fn create_site(&self, site: SiteRecord) -> StoreResult<SiteRecord> {
        debug!(site_id = %site.site_id, "creating site row");
        let _created: Option<SiteRecord> = self
            .db
            .create("sites")
            .content(site.clone())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(site)
    }

    async fn get_site(&self, site_id: &str) -> StoreResult<SiteRecord> {
        self.select_one("SELECT * FROM sites WHERE site_id = $sid", "sid", site_id.to_string())
            .await?
            .ok_or_else(|| StoreError::SiteNotFound {
                site_id: site_id.to_string(),
            })
    }

    async fn update_site(&self, site: SiteRecord) -> StoreResult<SiteRecord> {
        // Verify the row exists so updates never silently create.
        self.get_site(&site.site_id).await?;

        let sid_owned = site.site_id.clone();
        self.db
            .query("UPDATE sites CONTENT $row WHERE site_id = $sid")
            .bind(("row", site.clone()))
            .bind(("sid", sid_owned))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(site)
    }

    async fn create_build(&self, build: BuildRecord) -> StoreResult<BuildRecord> {
        debug!(build_id = %build.build_id, "creating build row");
        let _created: Option<BuildRecord> = self
            .db
            .create("builds")
            .content(build.clone())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(build)
    }

    async fn get_build(&self, build_id: &str) -> StoreResult<BuildRecord> {
        self.select_one("SELECT * FROM builds WHERE build_id = $bid", "bid", build_id.to_string())
            .await?
            .ok_or_else(|| StoreError::BuildNotFound {
                build_id: build_id.to_string(),
            })
    }

    async fn update_build(&self, build: BuildRecord) -> StoreResult<BuildRecord> {
        self.get_build(&build.build_id).await?;

        let bid_owned = build.build_id.clone();
        self.db
            .query("UPDATE builds CONTENT $row WHERE build_id = $bid")
            .bind(("row", build.clone()))
            .bind(("bid", bid_owned))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(build)
    }

    async fn save_bundle(&self, bundle: BundleRecord) -> StoreResult<BundleRecord> {
        debug!(site_id = %bundle.site_id, build_id = %bundle.build_id, "saving bundle row");
        let _created: Option<BundleRecord> = self
            .db
            .create("bundles")
            .content(bundle.clone())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(bundle)
    }

    async fn get_bundle(&self, site_id: &str, build_id: &str) -> StoreResult<BundleRecord> {
        let sid_owned = site_id.to_string();
        let bid_owned = build_id.to_string();
        let mut res = self
            .db
            .query("SELECT * FROM bundles WHERE site_id = $sid AND build_id = $bid")
            .bind(("sid", sid_owned))
            .bind(("bid", bid_owned))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let rows: Vec<BundleRecord> = res
            .take(0)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::BundleNotFound {
                site_id: site_id.to_string(),
            })
    }

    async fn get_latest_bundle(&self, site_id: &str) -> StoreResult<BundleRecord> {
        self.select_one(
            "SELECT * FROM bundles WHERE site_id = $sid ORDER BY created_at DESC LIMIT 1",
            "sid",
            site_id.to_string(),
        )
        .await?
        .ok_or_else(|| StoreError::BundleNotFound {
            site_id: site_id.to_string(),
        })
    }
}

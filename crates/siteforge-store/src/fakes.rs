//! In-memory fakes for storage traits (testing and local runs).
//!
//! Provides [`MemorySiteStore`], a contract-complete `SiteStore` backed by
//! `Mutex<HashMap>`, and [`FailingSiteStore`], a wrapper that fails a chosen
//! operation so failure paths can be exercised deterministically.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::records::{BuildRecord, BundleRecord, SiteRecord};
use crate::traits::{SiteStore, StoreResult};

// ---------------------------------------------------------------------------
// MemorySiteStore
// ---------------------------------------------------------------------------

/// In-memory site store backed by three `HashMap`s.
#[derive(Debug, Default)]
pub struct MemorySiteStore {
    sites: Mutex<HashMap<String, SiteRecord>>,
    builds: Mutex<HashMap<String, BuildRecord>>,
    bundles: Mutex<Vec<BundleRecord>>,
}

impl MemorySiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bundle rows stored (test helper).
    pub fn bundle_count(&self) -> usize {
        self.bundles.lock().unwrap().len()
    }
}

#[async_trait]
impl SiteStore for MemorySiteStore {
    async fn create_site(&self, site: SiteRecord) -> StoreResult<SiteRecord> {
        let mut sites = self.sites.lock().unwrap();
        sites.insert(site.site_id.clone(), site.clone());
        Ok(site)
    }

    async fn get_site(&self, site_id: &str) -> StoreResult<SiteRecord> {
        let sites = self.sites.lock().unwrap();
        sites
            .get(site_id)
            .cloned()
            .ok_or_else(|| StoreError::SiteNotFound {
                site_id: site_id.to_string(),
            })
    }

    async fn update_site(&self, site: SiteRecord) -> StoreResult<SiteRecord> {
        let mut sites = self.sites.lock().unwrap();
        if !sites.contains_key(&site.site_id) {
            return Err(StoreError::SiteNotFound {
                site_id: site.site_id.clone(),
            });
        }
        sites.insert(site.site_id.clone(), site.clone());
        Ok(site)
    }

    async fn create_build(&self, build: BuildRecord) -> StoreResult<BuildRecord> {
        let mut builds = self.builds.lock().unwrap();
        builds.insert(build.build_id.clone(), build.clone());
        Ok(build)
    }

    async fn get_build(&self, build_id: &str) -> StoreResult<BuildRecord> {
        let builds = self.builds.lock().unwrap();
        builds
            .get(build_id)
            .cloned()
            .ok_or_else(|| StoreError::BuildNotFound {
                build_id: build_id.to_string(),
            })
    }

    async fn update_build(&self, build: BuildRecord) -> StoreResult<BuildRecord> {
        let mut builds = self.builds.lock().unwrap();
        if !builds.contains_key(&build.build_id) {
            return Err(StoreError::BuildNotFound {
                build_id: build.build_id.clone(),
            });
        }
        builds.insert(build.build_id.clone(), build.clone());
        Ok(build)
    }

    async fn save_bundle(&self, bundle: BundleRecord) -> StoreResult<BundleRecord> {
        let mut bundles = self.bundles.lock().unwrap();
        bundles.push(bundle.clone());
        Ok(bundle)
    }

    async fn get_bundle(&self, site_id: &str, build_id: &str) -> StoreResult<BundleRecord> {
        let bundles = self.bundles.lock().unwrap();
        bundles
            .iter()
            .find(|b| b.site_id == site_id && b.build_id == build_id)
            .cloned()
            .ok_or_else(|| StoreError::BundleNotFound {
                site_id: site_id.to_string(),
            })
    }

    async fn get_latest_bundle(&self, site_id: &str) -> StoreResult<BundleRecord> {
        let bundles = self.bundles.lock().unwrap();
        bundles
            .iter()
            .filter(|b| b.site_id == site_id)
            .max_by_key(|b| b.created_at)
            .cloned()
            .ok_or_else(|| StoreError::BundleNotFound {
                site_id: site_id.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// FailingSiteStore
// ---------------------------------------------------------------------------

/// Which store operation [`FailingSiteStore`] should reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailingOp {
    CreateSite,
    CreateBuild,
    UpdateBuild,
    SaveBundle,
}

/// Wraps a [`MemorySiteStore`] and fails exactly one operation kind.
///
/// Used to verify the pipeline's stage-failure semantics without a real
/// backend outage.
#[derive(Debug)]
pub struct FailingSiteStore {
    inner: MemorySiteStore,
    fail_on: FailingOp,
}

impl FailingSiteStore {
    pub fn new(fail_on: FailingOp) -> Self {
        Self {
            inner: MemorySiteStore::new(),
            fail_on,
        }
    }

    /// Access the wrapped store (to inspect surviving rows after a failure).
    pub fn inner(&self) -> &MemorySiteStore {
        &self.inner
    }

    fn reject<T>(&self, op: FailingOp) -> Option<StoreResult<T>> {
        if self.fail_on == op {
            Some(Err(StoreError::Backend(format!(
                "injected failure for {op:?}"
            ))))
        } else {
            None
        }
    }
}

#[async_trait]
impl SiteStore for FailingSiteStore {
    async fn create_site(&self, site: SiteRecord) -> StoreResult<SiteRecord> {
        if let Some(err) = self.reject(FailingOp::CreateSite) {
            return err;
        }
        self.inner.create_site(site).await
    }

    async fn get_site(&self, site_id: &str) -> StoreResult<SiteRecord> {
        self.inner.get_site(site_id).await
    }

    async fn update_site(&self, site: SiteRecord) -> StoreResult<SiteRecord> {
        self.inner.update_site(site).await
    }

    async fn create_build(&self, build: BuildRecord) -> StoreResult<BuildRecord> {
        if let Some(err) = self.reject(FailingOp::CreateBuild) {
            return err;
        }
        self.inner.create_build(build).await
    }

    async fn get_build(&self, build_id: &str) -> StoreResult<BuildRecord> {
        self.inner.get_build(build_id).await
    }

    async fn update_build(&self, build: BuildRecord) -> StoreResult<BuildRecord> {
        if let Some(err) = self.reject(FailingOp::UpdateBuild) {
            return err;
        }
        self.inner.update_build(build).await
    }

    async fn save_bundle(&self, bundle: BundleRecord) -> StoreResult<BundleRecord> {
        if let Some(err) = self.reject(FailingOp::SaveBundle) {
            return err;
        }
        self.inner.save_bundle(bundle).await
    }

    async fn get_bundle(&self, site_id: &str, build_id: &str) -> StoreResult<BundleRecord> {
        self.inner.get_bundle(site_id, build_id).await
    }

    async fn get_latest_bundle(&self, site_id: &str) -> StoreResult<BundleRecord> {
        self.inner.get_latest_bundle(site_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SiteRowStatus;
    use chrono::Utc;

    fn site(id: &str) -> SiteRecord {
        SiteRecord {
            site_id: id.to_string(),
            business_id: "biz-1".to_string(),
            owner_id: "owner-1".to_string(),
            name: "Test Site".to_string(),
            status: SiteRowStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_store_site_roundtrip() {
        let store = MemorySiteStore::new();
        store.create_site(site("s1")).await.unwrap();
        let got = store.get_site("s1").await.unwrap();
        assert_eq!(got.site_id, "s1");
        assert_eq!(got.status, SiteRowStatus::Draft);
    }

    #[tokio::test]
    async fn test_memory_store_missing_site() {
        let store = MemorySiteStore::new();
        let err = store.get_site("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::SiteNotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_site_fails() {
        let store = MemorySiteStore::new();
        let err = store.update_site(site("ghost")).await.unwrap_err();
        assert!(matches!(err, StoreError::SiteNotFound { .. }));
    }

    #[tokio::test]
    async fn test_failing_store_rejects_only_selected_op() {
        let store = FailingSiteStore::new(FailingOp::SaveBundle);
        store.create_site(site("s1")).await.unwrap();

        let bundle = BundleRecord {
            site_id: "s1".to_string(),
            build_id: "b1".to_string(),
            version: "1.0.0".to_string(),
            bundle_json: serde_json::json!({}),
            created_at: Utc::now(),
        };
        let err = store.save_bundle(bundle).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));

        // Rows written before the failure survive.
        assert!(store.get_site("s1").await.is_ok());
    }
}

//! Contract tests for `SiteStore` implementations.
//!
//! The same assertions run against the in-memory fake and the SurrealDB
//! adapter (in-memory engine), so both backends honor the trait guarantees.

use chrono::{Duration, Utc};
use siteforge_store::fakes::MemorySiteStore;
use siteforge_store::{
    BuildRecord, BuildRowStatus, BundleRecord, SiteRecord, SiteRowStatus, SiteStore, StoreError,
    SurrealConfig, SurrealSiteStore,
};

fn site(id: &str) -> SiteRecord {
    SiteRecord {
        site_id: id.to_string(),
        business_id: "biz-1".to_string(),
        owner_id: "owner-1".to_string(),
        name: "Untitled Site".to_string(),
        status: SiteRowStatus::Draft,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn build(id: &str, site_id: &str) -> BuildRecord {
    BuildRecord {
        build_id: id.to_string(),
        site_id: site_id.to_string(),
        mode: "template".to_string(),
        prompt: "a neighborhood bakery".to_string(),
        status: BuildRowStatus::Running,
        warnings_count: 0,
        errors_count: 0,
        started_at: Utc::now(),
        finished_at: None,
    }
}

fn bundle(site_id: &str, build_id: &str, age_minutes: i64) -> BundleRecord {
    BundleRecord {
        site_id: site_id.to_string(),
        build_id: build_id.to_string(),
        version: "1.0.0".to_string(),
        bundle_json: serde_json::json!({"build": build_id}),
        created_at: Utc::now() - Duration::minutes(age_minutes),
    }
}

async fn assert_store_contract(store: &dyn SiteStore) {
    // Site CRUD
    store.create_site(site("s1")).await.expect("create_site");
    let mut s = store.get_site("s1").await.expect("get_site");
    assert_eq!(s.status, SiteRowStatus::Draft);

    s.status = SiteRowStatus::Preview;
    s.name = "Crumb & Crust".to_string();
    store.update_site(s).await.expect("update_site");
    let s = store.get_site("s1").await.unwrap();
    assert_eq!(s.status, SiteRowStatus::Preview);
    assert_eq!(s.name, "Crumb & Crust");

    // Build CRUD
    store.create_build(build("b1", "s1")).await.expect("create_build");
    let b = store.get_build("b1").await.expect("get_build");
    assert_eq!(b.status, BuildRowStatus::Running);

    let done = b.complete(1, 0, Utc::now());
    store.update_build(done).await.expect("update_build");
    let b = store.get_build("b1").await.unwrap();
    assert_eq!(b.status, BuildRowStatus::Completed);
    assert_eq!(b.warnings_count, 1);
    assert!(b.finished_at.is_some());

    // Bundles: exact and latest
    store.save_bundle(bundle("s1", "b0", 10)).await.expect("save_bundle");
    store.save_bundle(bundle("s1", "b1", 0)).await.expect("save_bundle");

    let exact = store.get_bundle("s1", "b0").await.expect("get_bundle");
    assert_eq!(exact.build_id, "b0");

    let latest = store.get_latest_bundle("s1").await.expect("get_latest_bundle");
    assert_eq!(latest.build_id, "b1", "latest bundle must be newest by created_at");

    // Missing rows surface typed errors
    assert!(matches!(
        store.get_site("missing").await.unwrap_err(),
        StoreError::SiteNotFound { .. }
    ));
    assert!(matches!(
        store.get_build("missing").await.unwrap_err(),
        StoreError::BuildNotFound { .. }
    ));
    assert!(matches!(
        store.get_latest_bundle("missing").await.unwrap_err(),
        StoreError::BundleNotFound { .. }
    ));
}

#[tokio::test]
async fn test_memory_store_contract() {
    let store = MemorySiteStore::new();
    assert_store_contract(&store).await;
}

#[tokio::test]
async fn test_surreal_store_contract() {
    let store = SurrealSiteStore::in_memory()
        .await
        .expect("in-memory surreal store");
    assert_store_contract(&store).await;
}

#[tokio::test]
async fn test_surreal_store_local_persistence() {
    let dir = tempfile::tempdir().expect("scratch dir");
    let url = format!("surrealkv://{}", dir.path().join("db").display());
    let store = SurrealSiteStore::connect(SurrealConfig::new(url))
        .await
        .expect("local surrealkv store");

    store.create_site(site("s-local")).await.unwrap();
    let got = store.get_site("s-local").await.unwrap();
    assert_eq!(got.site_id, "s-local");
}

#[tokio::test]
async fn test_update_never_creates() {
    let store = MemorySiteStore::new();
    let err = store.update_site(site("ghost")).await.unwrap_err();
    assert!(matches!(err, StoreError::SiteNotFound { .. }));

    let err = store.update_build(build("ghost", "s1")).await.unwrap_err();
    assert!(matches!(err, StoreError::BuildNotFound { .. }));
}

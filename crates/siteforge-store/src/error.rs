//! Error types for siteforge-store.

use thiserror::Error;

/// Errors that can occur in the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database connection error
    #[error("store connection failed: {0}")]
    Connection(String),

    /// Backend query error
    #[error("store backend error: {0}")]
    Backend(String),

    /// Serialization error
    #[error("store serialization failed: {0}")]
    Serialization(String),

    /// Site row not found
    #[error("site not found: {site_id}")]
    SiteNotFound { site_id: String },

    /// Build row not found
    #[error("build not found: {build_id}")]
    BuildNotFound { build_id: String },

    /// Bundle row not found
    #[error("bundle not found for site {site_id}")]
    BundleNotFound { site_id: String },

    /// Row exists but is in a state the operation does not allow
    #[error("invalid row state for {id}: have {status}, expected {expected}")]
    InvalidRowState {
        id: String,
        status: String,
        expected: String,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::SiteNotFound {
            site_id: "site-1".to_string(),
        };
        assert!(err.to_string().contains("site not found"));
        assert!(err.to_string().contains("site-1"));

        let err = StoreError::Backend("connection reset".to_string());
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_invalid_row_state_display() {
        let err = StoreError::InvalidRowState {
            id: "build-9".to_string(),
            status: "completed".to_string(),
            expected: "running".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("build-9"));
        assert!(msg.contains("completed"));
        assert!(msg.contains("running"));
    }
}

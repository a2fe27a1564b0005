//! # Object Store
//!
//! Abstract interface over the keyed document store the notifier reads and
//! writes: Report objects (get, create, replace) and credential Secrets (get).
//!
//! - `cluster.rs` - the Kubernetes API, used in the operator
//! - `memory.rs` - an in-process map, used by tests and local tooling
//!
//! Implementations must report a missing object as [`StoreError::NotFound`];
//! the report upsert relies on it to pick the create path.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;

use crate::crd::Report;
use crate::error::StoreError;

mod cluster;
mod memory;

pub use cluster::KubeStore;
pub use memory::InMemoryStore;

/// Keyed document store holding Reports and Secrets
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Get a (cluster-scoped) Report by name
    async fn get_report(&self, name: &str) -> Result<Report, StoreError>;

    /// Create a Report; fails if one with the same name exists
    async fn create_report(&self, report: &Report) -> Result<Report, StoreError>;

    /// Replace an existing Report, last writer wins
    async fn replace_report(&self, report: &Report) -> Result<Report, StoreError>;

    /// Get a Secret by namespace and name
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, StoreError>;
}

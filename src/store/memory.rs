//! # In-Memory Object Store
//!
//! [`ObjectStore`] kept in process memory. Objects are cloned in and out, so
//! callers never share state with the store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;

use super::ObjectStore;
use crate::crd::Report;
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    reports: Mutex<BTreeMap<String, Report>>,
    /// Keyed by (namespace, name)
    secrets: Mutex<BTreeMap<(String, String), Secret>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave a map half-written
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`InMemoryStore::insert_secret`]
    #[must_use]
    pub fn with_secret(self, secret: Secret) -> Self {
        self.insert_secret(secret);
        self
    }

    /// Store a Secret under its metadata namespace and name
    pub fn insert_secret(&self, secret: Secret) {
        let key = (secret.namespace().unwrap_or_default(), secret.name_any());
        lock(&self.secrets).insert(key, secret);
    }

    /// Current content of a Report, if present
    #[must_use]
    pub fn report(&self, name: &str) -> Option<Report> {
        lock(&self.reports).get(name).cloned()
    }

    /// Number of Reports held
    #[must_use]
    pub fn report_count(&self) -> usize {
        lock(&self.reports).len()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn get_report(&self, name: &str) -> Result<Report, StoreError> {
        self.report(name).ok_or_else(|| StoreError::NotFound {
            kind: "Report",
            name: name.to_string(),
        })
    }

    async fn create_report(&self, report: &Report) -> Result<Report, StoreError> {
        let name = report.name_any();
        let mut reports = lock(&self.reports);
        if reports.contains_key(&name) {
            return Err(StoreError::Backend(format!("Report {name} already exists")));
        }
        reports.insert(name, report.clone());
        Ok(report.clone())
    }

    async fn replace_report(&self, report: &Report) -> Result<Report, StoreError> {
        let name = report.name_any();
        let mut reports = lock(&self.reports);
        match reports.get_mut(&name) {
            Some(existing) => {
                *existing = report.clone();
                Ok(report.clone())
            }
            None => Err(StoreError::NotFound {
                kind: "Report",
                name,
            }),
        }
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, StoreError> {
        lock(&self.secrets)
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "Secret",
                name: format!("{namespace}/{name}"),
            })
    }
}

//! # Kubernetes Object Store
//!
//! [`ObjectStore`] backed by the Kubernetes API server.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, PostParams};
use kube::{Client, ResourceExt};
use tracing::debug;

use super::ObjectStore;
use crate::crd::Report;
use crate::error::StoreError;

/// Object store talking to the cluster the operator runs in
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn reports(&self) -> Api<Report> {
        // Reports are cluster-scoped, like the Cleaner they belong to
        Api::all(self.client.clone())
    }
}

/// Map a 404 from the API server to [`StoreError::NotFound`]
fn not_found_or(err: kube::Error, kind: &'static str, name: &str) -> StoreError {
    match err {
        kube::Error::Api(api_err) if api_err.code == 404 => StoreError::NotFound {
            kind,
            name: name.to_string(),
        },
        other => StoreError::Kube(other),
    }
}

#[async_trait]
impl ObjectStore for KubeStore {
    async fn get_report(&self, name: &str) -> Result<Report, StoreError> {
        self.reports()
            .get(name)
            .await
            .map_err(|e| not_found_or(e, "Report", name))
    }

    async fn create_report(&self, report: &Report) -> Result<Report, StoreError> {
        debug!("Creating Report {}", report.name_any());
        Ok(self
            .reports()
            .create(&PostParams::default(), report)
            .await?)
    }

    async fn replace_report(&self, report: &Report) -> Result<Report, StoreError> {
        let name = report.name_any();
        debug!("Replacing Report {}", name);
        self.reports()
            .replace(&name, &PostParams::default(), report)
            .await
            .map_err(|e| not_found_or(e, "Report", &name))
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, StoreError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        secrets
            .get(name)
            .await
            .map_err(|e| not_found_or(e, "Secret", &format!("{namespace}/{name}")))
    }
}

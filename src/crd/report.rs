//! # Report
//!
//! Outcome of the latest Cleaner run. There is one Report per Cleaner, with
//! the same name, and every run replaces its spec.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::cleaner::Action;

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "apps.projectsveltos.io",
    version = "v1alpha1",
    kind = "Report",
    printcolumn = r#"{"name":"Action", "type":"string", "jsonPath":".spec.action"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ReportSpec {
    /// Action of the Cleaner that produced this report
    #[serde(default)]
    pub action: Action,
    /// One entry per resource the action touched
    #[serde(default, rename = "resources")]
    pub resource_info: Vec<ResourceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    /// Identity of the resource
    pub resource: ResourceRef,
    /// Outcome message with the report build time appended
    #[serde(default)]
    pub message: String,
}

/// Identity of a Kubernetes object
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    /// Empty for cluster-scoped resources
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    pub name: String,
    pub kind: String,
    pub api_version: String,
}

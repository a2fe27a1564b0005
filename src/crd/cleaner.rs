//! # Cleaner
//!
//! The cleanup policy as seen by the notifier. Selection and action fields
//! owned by the cleanup engine are not modelled here; unknown fields are
//! ignored on decode.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::notifications::Notification;

/// Cleaner Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: apps.projectsveltos.io/v1alpha1
/// kind: Cleaner
/// metadata:
///   name: stale-configmaps
/// spec:
///   schedule: "0 * * * *"
///   action: Delete
///   notifications:
///   - name: report
///     type: CleanerReport
///   - name: slack
///     type: Slack
///     notificationRef:
///       apiVersion: v1
///       kind: Secret
///       namespace: default
///       name: slack
/// ```
#[derive(CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "apps.projectsveltos.io",
    version = "v1alpha1",
    kind = "Cleaner",
    printcolumn = r#"{"name":"Action", "type":"string", "jsonPath":".spec.action"}"#
)]
#[serde(rename_all = "camelCase")]
// Selection and action fields belong to the cleanup engine and must survive
// API server pruning
#[schemars(extend("x-kubernetes-preserve-unknown-fields" = true))]
pub struct CleanerSpec {
    /// Cron expression the cleanup engine runs on
    pub schedule: String,
    /// Action applied to matching resources
    #[serde(default)]
    pub action: Action,
    /// Destinations the report of each run is delivered to, in order
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

/// Action a Cleaner performs on matching resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum Action {
    #[default]
    Delete,
    Transform,
    /// Dry run: matching resources are only reported
    Scan,
}

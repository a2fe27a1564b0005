//! # Report
//!
//! Builds the report of a Cleaner run and encodes it for delivery.
//!
//! The builder is pure apart from reading the clock once. Every destination
//! receives the same [`ReportPayload`] bytes for the same report.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::constants::{REPORT_MESSAGE_PREFIX, REPORT_TIME_SEPARATOR};
use crate::crd::{Action, ReportSpec, ResourceInfo, ResourceRef};

mod persist;

pub use persist::upsert_report;

/// Outcome of the cleanup action on one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResult {
    pub resource: ResourceRef,
    pub message: String,
}

/// Build a report stamped with the current time
#[must_use]
pub fn generate_report_spec(resources: &[ResourceResult], action: Action) -> ReportSpec {
    generate_report_spec_at(resources, action, Utc::now())
}

/// Build a report stamped with `generated_at`
///
/// Entries keep the input order; each message gets `". time: <RFC 3339>"`
/// appended.
#[must_use]
pub fn generate_report_spec_at(
    resources: &[ResourceResult],
    action: Action,
    generated_at: DateTime<Utc>,
) -> ReportSpec {
    let stamp = format!(
        "{REPORT_TIME_SEPARATOR}{}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    ReportSpec {
        action,
        resource_info: resources
            .iter()
            .map(|result| ResourceInfo {
                resource: result.resource.clone(),
                message: format!("{}{stamp}", result.message),
            })
            .collect(),
    }
}

/// Text sent alongside the report to every chat destination
#[must_use]
pub fn report_message(cleaner_name: &str) -> String {
    format!("{REPORT_MESSAGE_PREFIX}: {cleaner_name}")
}

/// JSON encoding of a [`ReportSpec`], as attached to chat messages and mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPayload(String);

impl ReportPayload {
    /// # Errors
    /// Returns an error if the report cannot be serialized
    pub fn encode(spec: &ReportSpec) -> Result<Self, serde_json::Error> {
        serde_json::to_string(spec).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result(namespace: &str, name: &str, kind: &str, message: &str) -> ResourceResult {
        ResourceResult {
            resource: ResourceRef {
                namespace: namespace.to_string(),
                name: name.to_string(),
                kind: kind.to_string(),
                api_version: "v1".to_string(),
            },
            message: message.to_string(),
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_report_has_one_entry_per_result_in_order() {
        let results = vec![
            result("default", "cm-a", "ConfigMap", "deleted"),
            result("kube-system", "cm-b", "ConfigMap", "deleted"),
            result("", "pv-1", "PersistentVolume", "would be deleted"),
        ];

        let spec = generate_report_spec_at(&results, Action::Scan, fixed_time());

        assert_eq!(spec.action, Action::Scan);
        assert_eq!(spec.resource_info.len(), results.len());
        for (info, input) in spec.resource_info.iter().zip(&results) {
            assert_eq!(info.resource, input.resource);
        }
    }

    #[test]
    fn test_report_message_carries_build_time() {
        let results = vec![result("default", "pod-1", "Pod", "deleted")];

        let spec = generate_report_spec_at(&results, Action::Delete, fixed_time());

        assert_eq!(
            spec.resource_info[0].message,
            "deleted. time: 2024-03-01T12:30:00Z"
        );
    }

    #[test]
    fn test_empty_results_produce_empty_report() {
        let spec = generate_report_spec_at(&[], Action::Transform, fixed_time());

        assert_eq!(spec.action, Action::Transform);
        assert!(spec.resource_info.is_empty());
    }

    #[test]
    fn test_report_message_names_instance() {
        assert_eq!(
            report_message("stale-pods"),
            "This report has been generated by k8s-cleaner for instance: stale-pods"
        );
    }

    #[test]
    fn test_payload_is_stable_for_identical_reports() {
        let results = vec![result("default", "cm-a", "ConfigMap", "deleted")];
        let spec = generate_report_spec_at(&results, Action::Delete, fixed_time());

        let first = ReportPayload::encode(&spec).unwrap();
        let second = ReportPayload::encode(&spec.clone()).unwrap();

        assert_eq!(first.as_bytes(), second.as_bytes());
        let decoded: serde_json::Value = serde_json::from_str(first.as_str()).unwrap();
        assert_eq!(decoded["action"], "Delete");
        assert_eq!(decoded["resources"][0]["resource"]["apiVersion"], "v1");
        assert_eq!(decoded["resources"][0]["resource"]["name"], "cm-a");
    }
}

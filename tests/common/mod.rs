//! Common test utilities for Pact contract tests
//!
//! Provides rustls crypto provider setup and builders for the Secrets,
//! notifications and report payload every sink contract needs.

#![allow(dead_code, reason = "each test binary uses a subset")]

use std::sync::Once;

use chrono::{TimeZone, Utc};
use cleaner_notifier::crd::{Action, Notification, NotificationRef, NotificationType, ResourceRef};
use cleaner_notifier::report::{generate_report_spec_at, ReportPayload, ResourceResult};
use cleaner_notifier::store::InMemoryStore;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Uses a `Once` so it runs a single time across all tests in a binary.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(cleaner_notifier::install_crypto_provider);
}

pub const NAMESPACE: &str = "cleaner-system";

/// Store holding one Secret named `name` with `entries` as data
pub fn store_with_secret(name: &str, entries: &[(&str, &str)]) -> InMemoryStore {
    InMemoryStore::new().with_secret(Secret {
        metadata: ObjectMeta {
            namespace: Some(NAMESPACE.to_string()),
            name: Some(name.to_string()),
            ..ObjectMeta::default()
        },
        data: Some(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), ByteString(v.as_bytes().to_vec())))
                .collect(),
        ),
        ..Secret::default()
    })
}

/// Notification referencing the Secret `secret_name` in [`NAMESPACE`]
pub fn notification(notification_type: NotificationType, secret_name: &str) -> Notification {
    Notification {
        name: format!("{}-contract", notification_type.as_str().to_lowercase()),
        notification_type,
        notification_ref: Some(NotificationRef {
            kind: "Secret".to_string(),
            namespace: NAMESPACE.to_string(),
            name: secret_name.to_string(),
            api_version: "v1".to_string(),
        }),
    }
}

/// Report payload with a fixed timestamp so request bodies are stable
pub fn sample_payload() -> ReportPayload {
    let results = vec![ResourceResult {
        resource: ResourceRef {
            namespace: "default".to_string(),
            name: "orphaned-config".to_string(),
            kind: "ConfigMap".to_string(),
            api_version: "v1".to_string(),
        },
        message: "deleted".to_string(),
    }];
    let generated_at = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    ReportPayload::encode(&generate_report_spec_at(&results, Action::Delete, generated_at))
        .expect("report encodes")
}

pub const MESSAGE: &str = "This report has been generated by k8s-cleaner for instance: contract";

/// Mock server URL without the trailing slash
pub fn base_url(url: &impl ToString) -> String {
    url.to_string().trim_end_matches('/').to_string()
}

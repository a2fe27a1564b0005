//! # Notification Configuration
//!
//! Destinations a cleanup report is delivered to once a Cleaner run completes.
//! Every destination except `CleanerReport` reads its credentials from the
//! Secret named by `notificationRef`.

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A single notification entry of a Cleaner
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Name of the notification, used only to tag log lines
    pub name: String,
    /// Destination type
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Reference to the Secret holding the destination credentials.
    /// Not needed for `CleanerReport`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_ref: Option<NotificationRef>,
}

impl Notification {
    /// `<type>:<name>`, the value every notification log line is tagged with
    #[must_use]
    pub fn log_tag(&self) -> String {
        format!("{}:{}", self.notification_type, self.name)
    }
}

/// Reference to the object carrying notification credentials.
///
/// Only `kind: Secret` with `apiVersion: v1` is accepted when resolving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRef {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub api_version: String,
}

/// Destination type of a notification.
///
/// Values that are not known to this build deserialize into `Unsupported`
/// so a bad entry is reported when it is dispatched instead of failing the
/// whole Cleaner decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// Persist a Report object named after the Cleaner
    CleanerReport,
    Slack,
    Webex,
    Discord,
    Teams,
    /// Email through an SMTP relay
    Smtp,
    Unsupported(String),
}

impl NotificationType {
    /// Wire value as used in the Cleaner spec
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CleanerReport => "CleanerReport",
            Self::Slack => "Slack",
            Self::Webex => "Webex",
            Self::Discord => "Discord",
            Self::Teams => "Teams",
            Self::Smtp => "SMTP",
            Self::Unsupported(value) => value,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for NotificationType {
    fn from(value: &str) -> Self {
        match value {
            "CleanerReport" => Self::CleanerReport,
            "Slack" => Self::Slack,
            "Webex" => Self::Webex,
            "Discord" => Self::Discord,
            "Teams" => Self::Teams,
            "SMTP" => Self::Smtp,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl Serialize for NotificationType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NotificationType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value.as_str()))
    }
}

impl JsonSchema for NotificationType {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("NotificationType")
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        // Unsupported is a decode-side fallback only, never advertised
        schemars::json_schema!({
            "type": "string",
            "description": "Notification destination. CleanerReport persists a Report object; the other types deliver the report to an external service using the credentials in notificationRef.",
            "enum": ["CleanerReport", "Slack", "Webex", "Discord", "Teams", "SMTP"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_round_trips_wire_values() {
        for value in ["CleanerReport", "Slack", "Webex", "Discord", "Teams", "SMTP"] {
            let parsed: NotificationType =
                serde_json::from_value(serde_json::json!(value)).expect("known type");
            assert!(
                !matches!(parsed, NotificationType::Unsupported(_)),
                "{value} should be a known type"
            );
            assert_eq!(serde_json::to_value(&parsed).unwrap(), serde_json::json!(value));
        }
    }

    #[test]
    fn test_unknown_notification_type_is_kept_not_rejected() {
        let json = r#"{"name": "ops", "type": "PagerDuty"}"#;
        let notification: Notification =
            serde_json::from_str(json).expect("unknown type must still decode");

        assert_eq!(
            notification.notification_type,
            NotificationType::Unsupported("PagerDuty".to_string())
        );
        assert_eq!(notification.log_tag(), "PagerDuty:ops");
        assert!(notification.notification_ref.is_none());
    }

    #[test]
    fn test_notification_ref_deserializes_camel_case() {
        let json = r#"{
            "name": "slack",
            "type": "Slack",
            "notificationRef": {
                "apiVersion": "v1",
                "kind": "Secret",
                "namespace": "default",
                "name": "slack-credentials"
            }
        }"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        let reference = notification.notification_ref.unwrap();

        assert_eq!(notification.notification_type, NotificationType::Slack);
        assert_eq!(reference.api_version, "v1");
        assert_eq!(reference.kind, "Secret");
        assert_eq!(reference.namespace, "default");
        assert_eq!(reference.name, "slack-credentials");
    }
}

//! # Errors
//!
//! Error types returned by the notifier.
//!
//! - [`StoreError`] - backing object store failures, with "not found" kept
//!   apart so callers can take the create path
//! - [`NotificationError`] - everything a dispatch can fail with
//!
//! A dispatch stops at the first error, so nothing here aggregates.

use thiserror::Error;

use crate::crd::NotificationType;

/// Failure reading or writing objects in the backing store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Failure of a non-Kubernetes store
    #[error("object store error: {0}")]
    Backend(String),
}

impl StoreError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure delivering a notification
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The notification reference is missing or does not name a core/v1 Secret
    #[error("notification {notification} must reference a v1 Secret holding its credentials: {reason}")]
    InvalidReference {
        notification: String,
        reason: String,
    },

    /// The referenced Secret exists but carries no data
    #[error("secret {namespace}/{name} contains no data")]
    EmptyCredentials { namespace: String, name: String },

    /// A key the destination requires is absent from the Secret
    #[error("secret does not contain {destination} field {field}")]
    MissingField {
        destination: &'static str,
        field: &'static str,
    },

    /// A key is present but its value cannot be used
    #[error("secret field {field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("invalid Teams webhook URL: {0}")]
    InvalidWebhookUrl(String),

    #[error("no handler registered for notification type {0}")]
    UnsupportedType(NotificationType),

    /// Notifier-level configuration cannot be used
    #[error("invalid notifier configuration: {0}")]
    InvalidConfig(String),

    #[error("object store error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request never produced a response
    #[error("{destination} request failed: {source}")]
    Transport {
        destination: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The destination answered but rejected the message
    #[error("{destination} rejected the message (status {status}): {message}")]
    Api {
        destination: &'static str,
        status: u16,
        message: String,
    },

    #[error("failed to send mail: {0}")]
    Mail(String),
}

impl NotificationError {
    pub(crate) fn transport(destination: &'static str, source: reqwest::Error) -> Self {
        Self::Transport {
            destination,
            source,
        }
    }

    /// True for errors caused by user configuration rather than by the
    /// store or the network; retrying the same cycle will fail the same way.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidReference { .. }
                | Self::EmptyCredentials { .. }
                | Self::MissingField { .. }
                | Self::InvalidField { .. }
                | Self::InvalidWebhookUrl(_)
                | Self::UnsupportedType(_)
                | Self::InvalidConfig(_)
        )
    }
}

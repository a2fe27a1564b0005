//! k8s-cleaner Notifier Library
//!
//! Delivers the report of a Cleaner run to the destinations the Cleaner
//! lists: a persisted Report object, Slack, Microsoft Teams, Discord, Webex
//! and SMTP.
//!
//! The entry point is [`notifications::Dispatcher::send_notifications`]. The
//! cleanup engine calls it once per run with the outcome of every resource
//! it acted on.
//!
//! ## Module Structure
//!
//! - `crd` - Cleaner and Report custom resources
//! - `report` - report builder and Report persistence
//! - `credentials` - Secret resolution for each destination
//! - `notifications` - sinks and the dispatch loop
//! - `store` - object store abstraction (Kubernetes, in-memory)
//! - `config` - notifier settings
//! - `observability` - logging and metrics

pub mod config;
pub mod constants;
pub mod credentials;
pub mod crd;
pub mod error;
pub mod notifications;
pub mod observability;
pub mod report;
pub mod store;

pub use error::{NotificationError, StoreError};
pub use notifications::Dispatcher;

/// Install ring as the process-wide rustls crypto provider
///
/// Hosts call this once before building a [`Dispatcher`]. A provider that is
/// already installed is left in place.
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }
}

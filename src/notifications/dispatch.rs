//! # Dispatch
//!
//! One pass over a Cleaner's notifications after a run.
//!
//! The report is built once, then each notification is delivered in declared
//! order. The first failure stops the pass and is returned; deliveries that
//! already succeeded are not undone.

use std::sync::Arc;
use std::time::Instant;

use kube::{Client, ResourceExt};
use tracing::{debug, info, info_span, Instrument};

use super::Sinks;
use crate::config::NotifierConfig;
use crate::crd::{Cleaner, Notification, NotificationType, ReportSpec};
use crate::error::NotificationError;
use crate::observability::metrics;
use crate::report::{
    generate_report_spec, report_message, upsert_report, ReportPayload, ResourceResult,
};
use crate::store::{KubeStore, ObjectStore};

/// Delivers Cleaner reports to their configured destinations
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn ObjectStore>,
    sinks: Sinks,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("sinks", &self.sinks)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, sinks: Sinks) -> Self {
        Self { store, sinks }
    }

    /// Dispatcher backed by the cluster, with the production sinks
    ///
    /// # Errors
    /// Returns an error if the sinks cannot be built from `config`
    pub fn from_client(
        client: Client,
        config: &NotifierConfig,
    ) -> Result<Self, NotificationError> {
        let store: Arc<dyn ObjectStore> = Arc::new(KubeStore::new(client));
        let sinks = Sinks::from_config(&store, config)?;
        Ok(Self::new(store, sinks))
    }

    /// Deliver the report of a Cleaner run to every configured notification
    ///
    /// # Errors
    /// Returns the first delivery error; later notifications are not attempted
    pub async fn send_notifications(
        &self,
        resources: &[ResourceResult],
        cleaner: &Cleaner,
    ) -> Result<(), NotificationError> {
        let notifications = &cleaner.spec.notifications;
        if notifications.is_empty() {
            debug!("no notifications configured");
            return Ok(());
        }

        let cleaner_name = cleaner.name_any();
        let report = generate_report_spec(resources, cleaner.spec.action);
        let message = report_message(&cleaner_name);
        let mut payload = None;

        for notification in notifications {
            let span = info_span!("notification", notification = %notification.log_tag());
            let started = Instant::now();

            let result = self
                .deliver(&cleaner_name, &report, &mut payload, &message, notification)
                .instrument(span.clone())
                .await;

            metrics::record_notification(
                type_label(&notification.notification_type),
                result.is_ok(),
                started.elapsed().as_secs_f64(),
            );

            if let Err(err) = result {
                span.in_scope(|| info!("failed to send notification: {err}"));
                metrics::increment_dispatch_aborted();
                return Err(err);
            }
        }

        Ok(())
    }

    async fn deliver(
        &self,
        cleaner_name: &str,
        report: &ReportSpec,
        payload: &mut Option<ReportPayload>,
        message: &str,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        let sink = match &notification.notification_type {
            NotificationType::CleanerReport => {
                upsert_report(self.store.as_ref(), cleaner_name, report).await?;
                return Ok(());
            }
            NotificationType::Slack => &self.sinks.slack,
            NotificationType::Teams => &self.sinks.teams,
            NotificationType::Discord => &self.sinks.discord,
            NotificationType::Webex => &self.sinks.webex,
            NotificationType::Smtp => &self.sinks.smtp,
            NotificationType::Unsupported(_) => {
                return Err(NotificationError::UnsupportedType(
                    notification.notification_type.clone(),
                ));
            }
        };

        // Encoded on first use, then shared by every sink
        let payload = match payload {
            Some(payload) => payload,
            None => payload.insert(ReportPayload::encode(report)?),
        };

        sink.deliver(payload, message, notification).await
    }
}

/// Metric label for a notification type; unknown values share one label
fn type_label(notification_type: &NotificationType) -> &str {
    match notification_type {
        NotificationType::Unsupported(_) => "Unsupported",
        known => known.as_str(),
    }
}

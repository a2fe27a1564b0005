//! # SMTP Sink
//!
//! Mails the report through a relay. The sink itself only knows the
//! [`Mailer`] collaborator: a [`MailerFactory`] turns the notification's
//! Secret reference into a ready mailer, and the sink sends one mail with
//! the message as subject and the report as a plain-text body.
//!
//! Port 465 uses implicit TLS; any other port upgrades with STARTTLS.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, info_span, Instrument};

use super::NotificationSink;
use crate::constants::{SMTPS_PORT, SMTP_BCC, SMTP_RECIPIENTS, SMTP_SENDER};
use crate::credentials::{get_secret, smtp_info, SmtpInfo};
use crate::crd::Notification;
use crate::error::NotificationError;
use crate::report::ReportPayload;
use crate::store::ObjectStore;

/// Sends a single mail
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(
        &self,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<(), NotificationError>;
}

/// Builds a [`Mailer`] from the Secret a notification references
#[async_trait]
pub trait MailerFactory: Send + Sync {
    async fn mailer(
        &self,
        notification: &Notification,
    ) -> Result<Box<dyn Mailer>, NotificationError>;
}

pub struct SmtpSink {
    factory: Arc<dyn MailerFactory>,
}

impl std::fmt::Debug for SmtpSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSink").finish_non_exhaustive()
    }
}

impl SmtpSink {
    #[must_use]
    pub fn new(factory: Arc<dyn MailerFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl NotificationSink for SmtpSink {
    async fn deliver(
        &self,
        payload: &ReportPayload,
        message: &str,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        let span = info_span!("smtp", secret = %secret_ref(notification));
        async {
            info!("send smtp message");
            let mailer = self.factory.mailer(notification).await?;
            mailer.send_mail(message, payload.as_str(), false).await
        }
        .instrument(span)
        .await
    }
}

/// `<namespace>/<name>` of the credentials Secret, empty when unset
fn secret_ref(notification: &Notification) -> String {
    notification
        .notification_ref
        .as_ref()
        .map(|reference| format!("{}/{}", reference.namespace, reference.name))
        .unwrap_or_default()
}

/// [`MailerFactory`] resolving SMTP settings from the object store
pub struct SmtpMailerFactory {
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for SmtpMailerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailerFactory").finish_non_exhaustive()
    }
}

impl SmtpMailerFactory {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MailerFactory for SmtpMailerFactory {
    async fn mailer(
        &self,
        notification: &Notification,
    ) -> Result<Box<dyn Mailer>, NotificationError> {
        let data = get_secret(self.store.as_ref(), notification).await?;
        Ok(Box::new(SmtpMailer::new(smtp_info(&data)?)))
    }
}

/// [`Mailer`] speaking SMTP through lettre
#[derive(Debug)]
pub struct SmtpMailer {
    info: SmtpInfo,
}

impl SmtpMailer {
    #[must_use]
    pub fn new(info: SmtpInfo) -> Self {
        Self { info }
    }

    fn build_message(
        &self,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<Message, NotificationError> {
        let mut builder = Message::builder()
            .from(mailbox(SMTP_SENDER, &self.info.sender)?)
            .subject(subject)
            .header(if is_html {
                ContentType::TEXT_HTML
            } else {
                ContentType::TEXT_PLAIN
            });

        for recipient in self.info.recipient_list() {
            builder = builder.to(mailbox(SMTP_RECIPIENTS, recipient)?);
        }
        for recipient in self.info.bcc_list() {
            builder = builder.bcc(mailbox(SMTP_BCC, recipient)?);
        }

        builder
            .body(body.to_string())
            .map_err(|err| NotificationError::Mail(err.to_string()))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotificationError> {
        let builder = if self.info.port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.info.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.info.host)
        }
        .map_err(|err| NotificationError::Mail(err.to_string()))?
        .port(self.info.port);

        // No password means the relay accepts unauthenticated submission
        let builder = if self.info.password.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                self.info.sender.clone(),
                self.info.password.clone(),
            ))
        };

        Ok(builder.build())
    }
}

fn mailbox(field: &'static str, address: &str) -> Result<Mailbox, NotificationError> {
    address
        .trim()
        .parse()
        .map_err(|err| NotificationError::InvalidField {
            field,
            reason: format!("{address:?} is not a valid address: {err}"),
        })
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_mail(
        &self,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<(), NotificationError> {
        let span = info_span!(
            "smtp.send",
            host = %self.info.host,
            port = self.info.port,
            recipients = %self.info.recipients,
        );
        async {
            if !self.info.identity.is_empty() {
                debug!("authorization identity is not sent; authenticating as the sender");
            }

            let message = self.build_message(subject, body, is_html)?;
            let response = self
                .transport()?
                .send(message)
                .await
                .map_err(|err| NotificationError::Mail(err.to_string()))?;

            debug!("smtp relay answered {}", response.code());
            Ok(())
        }
        .instrument(span)
        .await
    }
}

//! # Notifications
//!
//! Delivery of a Cleaner report to its configured destinations.
//!
//! - `dispatch.rs` - the dispatch loop, one pass per Cleaner run
//! - `slack.rs`, `teams.rs`, `discord.rs`, `webex.rs` - HTTP sinks
//! - `smtp.rs` - mail sink built on a mailer collaborator
//!
//! Every sink resolves its credentials on each call, sends exactly one request
//! and returns. Nothing is retried or cached between calls.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::config::NotifierConfig;
use crate::crd::Notification;
use crate::error::NotificationError;
use crate::report::ReportPayload;
use crate::store::ObjectStore;

mod discord;
mod dispatch;
mod slack;
mod smtp;
mod teams;
mod webex;

pub use discord::DiscordSink;
pub use dispatch::Dispatcher;
pub use slack::SlackSink;
pub use smtp::{Mailer, MailerFactory, SmtpMailer, SmtpMailerFactory, SmtpSink};
pub use teams::{TeamsSink, WebhookValidator};
pub use webex::WebexSink;

/// A destination a report can be delivered to
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver `payload` with `message` using the credentials `notification`
    /// references
    async fn deliver(
        &self,
        payload: &ReportPayload,
        message: &str,
        notification: &Notification,
    ) -> Result<(), NotificationError>;
}

/// One sink per external destination type
#[derive(Clone)]
pub struct Sinks {
    pub slack: Arc<dyn NotificationSink>,
    pub teams: Arc<dyn NotificationSink>,
    pub discord: Arc<dyn NotificationSink>,
    pub webex: Arc<dyn NotificationSink>,
    pub smtp: Arc<dyn NotificationSink>,
}

impl std::fmt::Debug for Sinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sinks").finish_non_exhaustive()
    }
}

impl Sinks {
    /// Build the production sinks, sharing one HTTP client
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or a configured
    /// Teams webhook pattern is not a valid regular expression
    pub fn from_config(
        store: &Arc<dyn ObjectStore>,
        config: &NotifierConfig,
    ) -> Result<Self, NotificationError> {
        let http = http_client(config)?;

        Ok(Self {
            slack: Arc::new(SlackSink::new(
                Arc::clone(store),
                http.clone(),
                &config.slack_api_url,
            )),
            teams: Arc::new(TeamsSink::new(
                Arc::clone(store),
                http.clone(),
                WebhookValidator::from_config(config)?,
            )),
            discord: Arc::new(DiscordSink::new(
                Arc::clone(store),
                http.clone(),
                &config.discord_api_url,
            )),
            webex: Arc::new(WebexSink::new(
                Arc::clone(store),
                http,
                &config.webex_api_url,
            )),
            smtp: Arc::new(SmtpSink::new(Arc::new(SmtpMailerFactory::new(
                Arc::clone(store),
            )))),
        })
    }
}

/// HTTP client shared by the chat sinks
fn http_client(config: &NotifierConfig) -> Result<reqwest::Client, NotificationError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.http_timeout() {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| NotificationError::transport("http client", err))
}

/// Read the body of a rejected response for the error message
async fn rejection(
    destination: &'static str,
    response: reqwest::Response,
) -> NotificationError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|err| format!("<unreadable body: {err}>"));
    NotificationError::Api {
        destination,
        status,
        message,
    }
}

/// Multipart request body: text fields plus one in-memory file part
#[derive(Debug, Clone, PartialEq, Eq)]
struct MultipartMessage {
    fields: Vec<(&'static str, String)>,
    file_field: &'static str,
    file_name: &'static str,
    mime: Option<&'static str>,
    bytes: Vec<u8>,
}

impl MultipartMessage {
    fn into_form(self, destination: &'static str) -> Result<Form, NotificationError> {
        let mut file = Part::bytes(self.bytes).file_name(self.file_name);
        if let Some(mime) = self.mime {
            file = file
                .mime_str(mime)
                .map_err(|err| NotificationError::transport(destination, err))?;
        }

        let form = self
            .fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        Ok(form.part(self.file_field, file))
    }
}

/// Strip trailing slashes so paths can be appended with `/`
fn base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

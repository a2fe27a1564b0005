//! # Discord Sink
//!
//! Sends a channel message through the bot API with the report attached as a
//! file named `k8s-cleaner-report`. The attachment is streamed from memory.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, info_span, Instrument};

use super::{base_url, rejection, MultipartMessage, NotificationSink};
use crate::constants::REPORT_ATTACHMENT_NAME;
use crate::credentials::{discord_info, get_secret};
use crate::crd::Notification;
use crate::error::NotificationError;
use crate::report::ReportPayload;
use crate::store::ObjectStore;

const DESTINATION: &str = "discord";

pub struct DiscordSink {
    store: Arc<dyn ObjectStore>,
    http: reqwest::Client,
    api_url: String,
}

impl std::fmt::Debug for DiscordSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordSink")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl DiscordSink {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, http: reqwest::Client, api_url: &str) -> Self {
        Self {
            store,
            http,
            api_url: base_url(api_url),
        }
    }
}

/// `payload_json` part referencing the single attachment
fn message_json(message: &str) -> String {
    json!({
        "content": message,
        "attachments": [{"id": 0, "filename": REPORT_ATTACHMENT_NAME}],
    })
    .to_string()
}

/// Message body with the report as the first attachment
fn attachment_message(payload: &ReportPayload, message: &str) -> MultipartMessage {
    MultipartMessage {
        fields: vec![("payload_json", message_json(message))],
        file_field: "files[0]",
        file_name: REPORT_ATTACHMENT_NAME,
        mime: None,
        bytes: payload.to_vec(),
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    async fn deliver(
        &self,
        payload: &ReportPayload,
        message: &str,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        let data = get_secret(self.store.as_ref(), notification).await?;
        let info = discord_info(&data)?;

        let span = info_span!("discord", server = %info.channel);
        async {
            info!("send discord message");

            let form = attachment_message(payload, message).into_form(DESTINATION)?;

            let response = self
                .http
                .post(format!("{}/channels/{}/messages", self.api_url, info.channel))
                .header(reqwest::header::AUTHORIZATION, format!("Bot {}", info.token))
                .multipart(form)
                .send()
                .await
                .map_err(|err| NotificationError::transport(DESTINATION, err))?;

            if !response.status().is_success() {
                return Err(rejection(DESTINATION, response).await);
            }

            debug!("discord message posted");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

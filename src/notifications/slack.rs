//! # Slack Sink
//!
//! Posts the message to a channel with `chat.postMessage`, carrying the report
//! as a message attachment.
//!
//! Slack answers `200 OK` for most failures and reports them in the body as
//! `{"ok": false, "error": "..."}`, so the body is always inspected.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Instrument};

use super::{base_url, rejection, NotificationSink};
use crate::credentials::{get_secret, slack_info};
use crate::crd::Notification;
use crate::error::NotificationError;
use crate::report::ReportPayload;
use crate::store::ObjectStore;

const DESTINATION: &str = "slack";

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    attachments: [Attachment<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Attachment<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackSink {
    store: Arc<dyn ObjectStore>,
    http: reqwest::Client,
    api_url: String,
}

impl std::fmt::Debug for SlackSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackSink")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl SlackSink {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, http: reqwest::Client, api_url: &str) -> Self {
        Self {
            store,
            http,
            api_url: base_url(api_url),
        }
    }
}

#[async_trait]
impl NotificationSink for SlackSink {
    async fn deliver(
        &self,
        payload: &ReportPayload,
        message: &str,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        let data = get_secret(self.store.as_ref(), notification).await?;
        let info = slack_info(&data)?;

        let span = info_span!("slack", channel = %info.channel);
        async {
            info!("send slack message");

            let request = PostMessageRequest {
                channel: &info.channel,
                text: message,
                attachments: [Attachment {
                    text: payload.as_str(),
                }],
            };

            let response = self
                .http
                .post(format!("{}/chat.postMessage", self.api_url))
                .bearer_auth(&info.token)
                .json(&request)
                .send()
                .await
                .map_err(|err| NotificationError::transport(DESTINATION, err))?;

            if !response.status().is_success() {
                return Err(rejection(DESTINATION, response).await);
            }

            let status = response.status().as_u16();
            let body: PostMessageResponse = response
                .json()
                .await
                .map_err(|err| NotificationError::transport(DESTINATION, err))?;

            if !body.ok {
                return Err(NotificationError::Api {
                    destination: DESTINATION,
                    status,
                    message: body.error.unwrap_or_else(|| "unknown error".to_string()),
                });
            }

            debug!("slack message posted");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

//! # Webex Sink
//!
//! Posts a markdown message to a room with the report attached. Webex expects
//! the attachment part under `files`; it is streamed from memory.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, info_span, Instrument};

use super::{base_url, rejection, MultipartMessage, NotificationSink};
use crate::constants::{REPORT_ATTACHMENT_NAME, WEBEX_ATTACHMENT_CONTENT_TYPE};
use crate::credentials::{get_secret, webex_info};
use crate::crd::Notification;
use crate::error::NotificationError;
use crate::report::ReportPayload;
use crate::store::ObjectStore;

const DESTINATION: &str = "webex";

pub struct WebexSink {
    store: Arc<dyn ObjectStore>,
    http: reqwest::Client,
    api_url: String,
}

impl std::fmt::Debug for WebexSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebexSink")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl WebexSink {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, http: reqwest::Client, api_url: &str) -> Self {
        Self {
            store,
            http,
            api_url: base_url(api_url),
        }
    }
}

/// Room message with the report under the `files` part
fn attachment_message(payload: &ReportPayload, room: &str, message: &str) -> MultipartMessage {
    MultipartMessage {
        fields: vec![("roomId", room.to_string()), ("markdown", message.to_string())],
        file_field: "files",
        file_name: REPORT_ATTACHMENT_NAME,
        mime: Some(WEBEX_ATTACHMENT_CONTENT_TYPE),
        bytes: payload.to_vec(),
    }
}

#[async_trait]
impl NotificationSink for WebexSink {
    async fn deliver(
        &self,
        payload: &ReportPayload,
        message: &str,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        let data = get_secret(self.store.as_ref(), notification).await?;
        let info = webex_info(&data)?;

        let span = info_span!("webex", room = %info.room);
        async {
            info!("send webex message");

            let form =
                attachment_message(payload, &info.room, message).into_form(DESTINATION)?;

            let response = self
                .http
                .post(format!("{}/messages", self.api_url))
                .bearer_auth(&info.token)
                .multipart(form)
                .send()
                .await
                .map_err(|err| NotificationError::transport(DESTINATION, err))?;

            if !response.status().is_success() {
                return Err(rejection(DESTINATION, response).await);
            }

            let body = response
                .text()
                .await
                .map_err(|err| NotificationError::transport(DESTINATION, err))?;
            debug!("response: {body}");

            Ok(())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{Action, ReportSpec};

    #[test]
    fn test_room_message_carries_report_file() {
        let payload = ReportPayload::encode(&ReportSpec {
            action: Action::Scan,
            resource_info: Vec::new(),
        })
        .unwrap();

        let body = attachment_message(&payload, "room-1", "**cleaned**");

        assert_eq!(
            body.fields,
            vec![
                ("roomId", "room-1".to_string()),
                ("markdown", "**cleaned**".to_string()),
            ]
        );
        assert_eq!(body.file_field, "files");
        assert_eq!(body.file_name, "k8s-cleaner-report");
        assert_eq!(body.mime, Some(WEBEX_ATTACHMENT_CONTENT_TYPE));
        assert_eq!(body.bytes, payload.as_bytes());
        assert!(body.into_form(DESTINATION).is_ok());
    }
}

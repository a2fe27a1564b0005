//! Pact contract tests for the Webex messages API
//!
//! The report is sent as a multipart `files` part; the contract covers the
//! route and the bearer token.

#[cfg(test)]
mod common;

use std::sync::Arc;

use cleaner_notifier::crd::NotificationType;
use cleaner_notifier::notifications::{NotificationSink, WebexSink};
use cleaner_notifier::NotificationError;
use common::{base_url, init_rustls, notification, sample_payload, store_with_secret, MESSAGE};
use pact_consumer::prelude::*;
use serde_json::json;

const TOKEN: &str = "webex-bot-token";
const ROOM: &str = "Y2lzY29zcGFyazovL3VzL1JPT00vY2xlYW5lcg";

fn webex_sink(api_url: &str) -> WebexSink {
    let store = store_with_secret(
        "webex-credentials",
        &[("WEBEX_TOKEN", TOKEN), ("WEBEX_ROOM_ID", ROOM)],
    );
    WebexSink::new(Arc::new(store), reqwest::Client::new(), api_url)
}

#[tokio::test]
async fn test_webex_create_message_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("k8s-cleaner-notifier", "Webex-API");

    pact_builder.interaction("create a room message with the report attached", "", |mut i| {
        i.given("the bot is a member of the room");
        i.request
            .method("POST")
            .path("/v1/messages")
            .header("authorization", format!("Bearer {TOKEN}"));
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": "Y2lzY29zcGFyazovL3VzL01FU1NBR0UvMQ",
                "roomId": ROOM,
                "markdown": MESSAGE,
                "files": ["https://webexapis.com/v1/contents/abc"]
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let sink = webex_sink(&format!("{}/v1", base_url(&mock_server.url())));

    sink.deliver(
        &sample_payload(),
        MESSAGE,
        &notification(NotificationType::Webex, "webex-credentials"),
    )
    .await
    .expect("Webex delivery should succeed");
}

#[tokio::test]
async fn test_webex_unauthorized_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("k8s-cleaner-notifier", "Webex-API");

    pact_builder.interaction("create a message with an expired token", "", |mut i| {
        i.given("the bot token has expired");
        i.request
            .method("POST")
            .path("/v1/messages")
            .header("authorization", format!("Bearer {TOKEN}"));
        i.response
            .status(401)
            .header("content-type", "application/json")
            .json_body(json!({
                "message": "The request requires a valid access token set in the Authorization request header.",
                "trackingId": "ROUTER_0001"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let sink = webex_sink(&format!("{}/v1", base_url(&mock_server.url())));

    let err = sink
        .deliver(
            &sample_payload(),
            MESSAGE,
            &notification(NotificationType::Webex, "webex-credentials"),
        )
        .await
        .expect_err("401 must be an error");

    assert!(matches!(
        err,
        NotificationError::Api {
            destination: "webex",
            status: 401,
            ..
        }
    ));
}

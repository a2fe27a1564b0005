//! # Microsoft Teams Sink
//!
//! Posts an Adaptive Card to an incoming webhook. The card title is the
//! message and its body is the report.
//!
//! The webhook URL is checked against the known Microsoft hosts before any
//! request is made: the legacy Office 365 connectors and the Power Automate
//! workflow endpoints. Extra patterns may be configured for private relays,
//! or the check turned off.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, info, info_span, Instrument};

use super::{rejection, NotificationSink};
use crate::config::NotifierConfig;
use crate::credentials::{get_secret, teams_info};
use crate::crd::Notification;
use crate::error::NotificationError;
use crate::report::ReportPayload;
use crate::store::ObjectStore;

const DESTINATION: &str = "teams";

const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
const ADAPTIVE_CARD_VERSION: &str = "1.5";

static OFFICE_CONNECTOR_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:.+\.webhook|outlook)\.office(?:365)?\.com$")
        .expect("Failed to compile Office connector pattern - this should never happen")
});

static WORKFLOW_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:.+\.)?(?:azure-api|logic\.azure|api\.powerplatform)\.(?:com|net)$")
        .expect("Failed to compile workflow pattern - this should never happen")
});

/// Checks the shape of Teams webhook URLs
#[derive(Debug, Clone)]
pub struct WebhookValidator {
    enabled: bool,
    extra: Vec<Regex>,
}

impl Default for WebhookValidator {
    fn default() -> Self {
        Self {
            enabled: true,
            extra: Vec::new(),
        }
    }
}

impl WebhookValidator {
    /// # Errors
    /// Returns [`NotificationError::InvalidConfig`] for a pattern that does not compile
    pub fn from_config(config: &NotifierConfig) -> Result<Self, NotificationError> {
        let extra = config
            .teams_webhook_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|err| {
                    NotificationError::InvalidConfig(format!(
                        "Teams webhook pattern {pattern:?}: {err}"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enabled: config.teams_webhook_validation,
            extra,
        })
    }

    /// Built-in patterns match the host of an `https` URL; configured
    /// patterns match the whole URL
    ///
    /// # Errors
    /// Returns [`NotificationError::InvalidWebhookUrl`] when no pattern matches
    pub fn validate(&self, url: &str) -> Result<(), NotificationError> {
        if !self.enabled {
            return Ok(());
        }

        if self.extra.iter().any(|pattern| pattern.is_match(url)) {
            return Ok(());
        }

        let known_host = reqwest::Url::parse(url)
            .ok()
            .filter(|parsed| parsed.scheme() == "https")
            .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase))
            .is_some_and(|host| {
                OFFICE_CONNECTOR_HOST.is_match(&host) || WORKFLOW_HOST.is_match(&host)
            });

        if known_host {
            Ok(())
        } else {
            Err(NotificationError::InvalidWebhookUrl(
                "URL does not match a known Teams webhook host".to_string(),
            ))
        }
    }
}

/// Adaptive Card message with a bold title and a wrapped text body
fn adaptive_card(title: &str, text: &str) -> Value {
    json!({
        "type": "message",
        "attachments": [{
            "contentType": ADAPTIVE_CARD_CONTENT_TYPE,
            "contentUrl": null,
            "content": {
                "$schema": ADAPTIVE_CARD_SCHEMA,
                "type": "AdaptiveCard",
                "version": ADAPTIVE_CARD_VERSION,
                "body": [
                    {
                        "type": "TextBlock",
                        "text": title,
                        "size": "Large",
                        "weight": "Bolder",
                        "wrap": true
                    },
                    {
                        "type": "TextBlock",
                        "text": text,
                        "wrap": true
                    }
                ]
            }
        }]
    })
}

pub struct TeamsSink {
    store: Arc<dyn ObjectStore>,
    http: reqwest::Client,
    validator: WebhookValidator,
}

impl std::fmt::Debug for TeamsSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamsSink")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl TeamsSink {
    #[must_use]
    pub fn new(
        store: Arc<dyn ObjectStore>,
        http: reqwest::Client,
        validator: WebhookValidator,
    ) -> Self {
        Self {
            store,
            http,
            validator,
        }
    }
}

#[async_trait]
impl NotificationSink for TeamsSink {
    async fn deliver(
        &self,
        payload: &ReportPayload,
        message: &str,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        let data = get_secret(self.store.as_ref(), notification).await?;
        let info = teams_info(&data)?;

        // The path carries the webhook secret; log the host only
        let host = reqwest::Url::parse(&info.webhook_url)
            .ok()
            .and_then(|url| url.host_str().map(String::from))
            .unwrap_or_default();

        let span = info_span!("teams", webhook_url = %host);
        async {
            info!("send teams message");

            self.validator.validate(&info.webhook_url)?;

            let response = self
                .http
                .post(info.webhook_url.as_str())
                .json(&adaptive_card(message, payload.as_str()))
                .send()
                .await
                .map_err(|err| NotificationError::transport(DESTINATION, err))?;

            if !response.status().is_success() {
                return Err(rejection(DESTINATION, response).await);
            }

            debug!("teams message posted");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_office_connector_urls() {
        let validator = WebhookValidator::default();

        for url in [
            "https://contoso.webhook.office.com/webhookb2/abc/IncomingWebhook/def/ghi",
            "https://outlook.office.com/webhook/abc",
            "https://outlook.office365.com/webhook/abc",
        ] {
            assert!(validator.validate(url).is_ok(), "{url} should be accepted");
        }
    }

    #[test]
    fn test_accepts_workflow_urls() {
        let validator = WebhookValidator::default();

        for url in [
            "https://prod-11.westus.logic.azure.com:443/workflows/abc/triggers/manual/paths/invoke",
            "https://default123.environment.api.powerplatform.com/powerautomate/automations/direct/workflows/abc",
        ] {
            assert!(validator.validate(url).is_ok(), "{url} should be accepted");
        }
    }

    #[test]
    fn test_rejects_unknown_hosts() {
        let validator = WebhookValidator::default();

        for url in [
            "not a url",
            "http://contoso.webhook.office.com/webhookb2/abc",
            "https://example.com/webhook",
        ] {
            let err = validator.validate(url).unwrap_err();
            assert!(matches!(err, NotificationError::InvalidWebhookUrl(_)), "{url}");
            assert!(err.is_configuration_error());
        }
    }

    #[test]
    fn test_known_host_in_path_is_rejected() {
        let validator = WebhookValidator::default();

        for url in [
            "https://attacker.example/x.webhook.office.com/hook",
            "https://attacker.example/logic.azure.com/hook",
            "https://attacker.example/?next=outlook.office.com",
            "https://outlook.office.com.attacker.example/webhook",
            "https://user@attacker.example/prod.logic.azure.com",
        ] {
            let err = validator.validate(url).unwrap_err();
            assert!(matches!(err, NotificationError::InvalidWebhookUrl(_)), "{url}");
        }
    }

    #[test]
    fn test_configured_patterns_extend_known_hosts() {
        let config = NotifierConfig {
            teams_webhook_patterns: vec![r"^https://relay\.internal/".to_string()],
            ..NotifierConfig::default()
        };
        let validator = WebhookValidator::from_config(&config).unwrap();

        assert!(validator.validate("https://relay.internal/teams").is_ok());
        assert!(validator.validate("https://other.internal/teams").is_err());
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let config = NotifierConfig {
            teams_webhook_validation: false,
            ..NotifierConfig::default()
        };
        let validator = WebhookValidator::from_config(&config).unwrap();

        assert!(validator.validate("http://localhost:8080/hook").is_ok());
    }

    #[test]
    fn test_adaptive_card_layout() {
        let card = adaptive_card("title", "{\"action\":\"Scan\"}");

        assert_eq!(card["type"], "message");
        let attachment = &card["attachments"][0];
        assert_eq!(attachment["contentType"], ADAPTIVE_CARD_CONTENT_TYPE);
        let body = &attachment["content"]["body"];
        assert_eq!(body[0]["text"], "title");
        assert_eq!(body[1]["text"], "{\"action\":\"Scan\"}");
        assert_eq!(body[1]["wrap"], true);
    }
}

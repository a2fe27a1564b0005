//! # Credentials
//!
//! Resolves the Secret a notification points at and pulls out the fields each
//! destination needs.
//!
//! A notification must reference a `v1` `Secret` in a named namespace. The
//! Secret must carry data; missing keys are reported by destination and key
//! name so the operator can fix the Secret without reading code.
//!
//! Resolved values are zeroized on drop and never printed by `Debug`.

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::ByteString;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{
    DEFAULT_SMTP_PORT, DISCORD_CHANNEL_ID, DISCORD_TOKEN, SECRET_API_VERSION, SECRET_KIND,
    SLACK_CHANNEL_ID, SLACK_TOKEN, SMTP_BCC, SMTP_HOST, SMTP_IDENTITY, SMTP_PASSWORD, SMTP_PORT,
    SMTP_RECIPIENTS, SMTP_SENDER, TEAMS_WEBHOOK_URL, WEBEX_ROOM_ID, WEBEX_TOKEN,
};
use crate::crd::Notification;
use crate::error::NotificationError;
use crate::store::ObjectStore;

/// Decoded data of a credentials Secret
pub type SecretData = BTreeMap<String, ByteString>;

const REDACTED: &str = "<redacted>";

/// Fetch the data of the Secret referenced by `notification`
///
/// # Errors
/// - [`NotificationError::InvalidReference`] when the reference is absent,
///   names another kind or API version, or has no namespace
/// - [`NotificationError::Store`] when the Secret cannot be read
/// - [`NotificationError::EmptyCredentials`] when the Secret has no data
pub async fn get_secret(
    store: &dyn ObjectStore,
    notification: &Notification,
) -> Result<SecretData, NotificationError> {
    let invalid = |reason: String| NotificationError::InvalidReference {
        notification: notification.log_tag(),
        reason,
    };

    let reference = notification
        .notification_ref
        .as_ref()
        .ok_or_else(|| invalid("notificationRef is not set".to_string()))?;

    if reference.kind != SECRET_KIND {
        return Err(invalid(format!("kind is {:?}", reference.kind)));
    }
    if reference.api_version != SECRET_API_VERSION {
        return Err(invalid(format!("apiVersion is {:?}", reference.api_version)));
    }
    if reference.namespace.is_empty() {
        return Err(invalid("namespace is not set".to_string()));
    }

    debug!(
        "reading credentials from secret {}/{}",
        reference.namespace, reference.name
    );
    let secret = store
        .get_secret(&reference.namespace, &reference.name)
        .await?;

    match secret.data {
        Some(data) if !data.is_empty() => Ok(data),
        _ => Err(NotificationError::EmptyCredentials {
            namespace: reference.namespace.clone(),
            name: reference.name.clone(),
        }),
    }
}

fn required(
    data: &SecretData,
    destination: &'static str,
    field: &'static str,
) -> Result<String, NotificationError> {
    optional(data, field).ok_or(NotificationError::MissingField { destination, field })
}

fn optional(data: &SecretData, field: &str) -> Option<String> {
    data.get(field)
        .map(|value| String::from_utf8_lossy(&value.0).into_owned())
}

/// Slack bot token and target channel
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SlackInfo {
    pub token: String,
    pub channel: String,
}

impl fmt::Debug for SlackInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackInfo")
            .field("token", &REDACTED)
            .field("channel", &self.channel)
            .finish()
    }
}

/// # Errors
/// Returns [`NotificationError::MissingField`] for an absent key
pub fn slack_info(data: &SecretData) -> Result<SlackInfo, NotificationError> {
    Ok(SlackInfo {
        token: required(data, "slack", SLACK_TOKEN)?,
        channel: required(data, "slack", SLACK_CHANNEL_ID)?,
    })
}

/// Teams incoming-webhook URL; the URL itself is the credential
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct TeamsInfo {
    pub webhook_url: String,
}

impl fmt::Debug for TeamsInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeamsInfo")
            .field("webhook_url", &REDACTED)
            .finish()
    }
}

/// # Errors
/// Returns [`NotificationError::MissingField`] for an absent key
pub fn teams_info(data: &SecretData) -> Result<TeamsInfo, NotificationError> {
    Ok(TeamsInfo {
        webhook_url: required(data, "teams", TEAMS_WEBHOOK_URL)?,
    })
}

/// Discord bot token and target channel
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DiscordInfo {
    pub token: String,
    pub channel: String,
}

impl fmt::Debug for DiscordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordInfo")
            .field("token", &REDACTED)
            .field("channel", &self.channel)
            .finish()
    }
}

/// # Errors
/// Returns [`NotificationError::MissingField`] for an absent key
pub fn discord_info(data: &SecretData) -> Result<DiscordInfo, NotificationError> {
    Ok(DiscordInfo {
        token: required(data, "discord", DISCORD_TOKEN)?,
        channel: required(data, "discord", DISCORD_CHANNEL_ID)?,
    })
}

/// Webex bot token and target room
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct WebexInfo {
    pub token: String,
    pub room: String,
}

impl fmt::Debug for WebexInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebexInfo")
            .field("token", &REDACTED)
            .field("room", &self.room)
            .finish()
    }
}

/// # Errors
/// Returns [`NotificationError::MissingField`] for an absent key
pub fn webex_info(data: &SecretData) -> Result<WebexInfo, NotificationError> {
    Ok(WebexInfo {
        token: required(data, "webex", WEBEX_TOKEN)?,
        room: required(data, "webex", WEBEX_ROOM_ID)?,
    })
}

/// SMTP relay settings and recipients
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SmtpInfo {
    /// Comma separated list, as stored in the Secret
    pub recipients: String,
    /// Comma separated list; empty when not set
    pub bcc: String,
    pub identity: String,
    pub sender: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl fmt::Debug for SmtpInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpInfo")
            .field("recipients", &self.recipients)
            .field("bcc", &self.bcc)
            .field("identity", &self.identity)
            .field("sender", &self.sender)
            .field("password", &REDACTED)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl SmtpInfo {
    /// Recipient addresses with surrounding whitespace removed
    #[must_use]
    pub fn recipient_list(&self) -> Vec<&str> {
        split_addresses(&self.recipients)
    }

    /// BCC addresses with surrounding whitespace removed
    #[must_use]
    pub fn bcc_list(&self) -> Vec<&str> {
        split_addresses(&self.bcc)
    }
}

fn split_addresses(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .collect()
}

/// Recipients, sender and host are required. Port defaults to 587.
///
/// # Errors
/// - [`NotificationError::MissingField`] for an absent required key
/// - [`NotificationError::InvalidField`] for a port that is not a number
pub fn smtp_info(data: &SecretData) -> Result<SmtpInfo, NotificationError> {
    let port = match optional(data, SMTP_PORT) {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|err| NotificationError::InvalidField {
                field: SMTP_PORT,
                reason: format!("{raw:?} is not a valid port: {err}"),
            })?,
        None => DEFAULT_SMTP_PORT,
    };

    Ok(SmtpInfo {
        recipients: required(data, "smtp", SMTP_RECIPIENTS)?,
        bcc: optional(data, SMTP_BCC).unwrap_or_default(),
        identity: optional(data, SMTP_IDENTITY).unwrap_or_default(),
        sender: required(data, "smtp", SMTP_SENDER)?,
        password: optional(data, SMTP_PASSWORD).unwrap_or_default(),
        host: required(data, "smtp", SMTP_HOST)?,
        port,
    })
}

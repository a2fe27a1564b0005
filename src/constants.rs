//! # Constants
//!
//! Shared constants used throughout the notifier.
//!
//! Secret keys match the ones the operator's notification library documents,
//! so existing Secrets keep working unchanged.

/// API group of the cleaner custom resources
pub const API_GROUP: &str = "apps.projectsveltos.io";

/// Kind a notification reference must point at
pub const SECRET_KIND: &str = "Secret";

/// API version a notification reference must carry (core group)
pub const SECRET_API_VERSION: &str = "v1";

/// Secret key holding the Slack bot token
pub const SLACK_TOKEN: &str = "SLACK_TOKEN";

/// Secret key holding the Slack channel ID
pub const SLACK_CHANNEL_ID: &str = "SLACK_CHANNEL_ID";

/// Secret key holding the Teams incoming webhook URL
pub const TEAMS_WEBHOOK_URL: &str = "TEAMS_WEBHOOK_URL";

/// Secret key holding the Discord bot token
pub const DISCORD_TOKEN: &str = "DISCORD_TOKEN";

/// Secret key holding the Discord channel ID
pub const DISCORD_CHANNEL_ID: &str = "DISCORD_CHANNEL_ID";

/// Secret key holding the Webex bot token
pub const WEBEX_TOKEN: &str = "WEBEX_TOKEN";

/// Secret key holding the Webex room ID
pub const WEBEX_ROOM_ID: &str = "WEBEX_ROOM_ID";

/// Comma separated list of mail recipients
pub const SMTP_RECIPIENTS: &str = "SMTP_RECIPIENTS";

/// Comma separated list of blind carbon copy recipients (optional)
pub const SMTP_BCC: &str = "SMTP_BCC";

/// Identity used for PLAIN authentication (optional)
pub const SMTP_IDENTITY: &str = "SMTP_IDENTITY";

/// Sender address, also the SMTP username
pub const SMTP_SENDER: &str = "SMTP_SENDER";

/// SMTP password (optional, no authentication when absent)
pub const SMTP_PASSWORD: &str = "SMTP_PASSWORD";

/// SMTP relay host
pub const SMTP_HOST: &str = "SMTP_HOST";

/// SMTP relay port (optional)
pub const SMTP_PORT: &str = "SMTP_PORT";

/// Default SMTP submission port (STARTTLS)
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP port using implicit TLS
pub const SMTPS_PORT: u16 = 465;

/// Default Slack Web API base URL
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Default Discord REST API base URL
pub const DEFAULT_DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Default Webex REST API base URL
pub const DEFAULT_WEBEX_API_URL: &str = "https://webexapis.com/v1";

/// File name used when the report is attached to a chat message
pub const REPORT_ATTACHMENT_NAME: &str = "k8s-cleaner-report";

/// Content type Webex attachments are sent with
pub const WEBEX_ATTACHMENT_CONTENT_TYPE: &str = "multipart/form-data";

/// Prefix of the message sent along with every report
pub const REPORT_MESSAGE_PREFIX: &str = "This report has been generated by k8s-cleaner for instance";

/// Separator placed between a resource message and the report timestamp
pub const REPORT_TIME_SEPARATOR: &str = ". time: ";

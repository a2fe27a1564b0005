//! # Notifier Configuration
//!
//! Process-level settings for the notification sinks.

use std::time::Duration;

use crate::constants::{DEFAULT_DISCORD_API_URL, DEFAULT_SLACK_API_URL, DEFAULT_WEBEX_API_URL};

/// Notifier-level configuration
///
/// All settings have defaults pointing at the public APIs. The dispatcher
/// never reads the environment itself; a host process that wants env-driven
/// settings calls [`NotifierConfig::from_env`].
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Slack Web API base URL
    pub slack_api_url: String,
    /// Discord REST API base URL (versioned)
    pub discord_api_url: String,
    /// Webex REST API base URL
    pub webex_api_url: String,
    /// Timeout applied to every outbound HTTP request (seconds).
    /// `None` leaves requests unbounded so the caller's cancellation decides.
    pub http_timeout_secs: Option<u64>,
    /// Check Teams webhook URLs against the known Microsoft hosts
    pub teams_webhook_validation: bool,
    /// Extra regular expressions a Teams webhook URL may match
    pub teams_webhook_patterns: Vec<String>,
    /// Log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Enable color in text format logs
    pub log_enable_color: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            slack_api_url: DEFAULT_SLACK_API_URL.to_string(),
            discord_api_url: DEFAULT_DISCORD_API_URL.to_string(),
            webex_api_url: DEFAULT_WEBEX_API_URL.to_string(),
            http_timeout_secs: None,
            teams_webhook_validation: true,
            teams_webhook_patterns: Vec::new(),
            log_level: "INFO".to_string(),
            log_format: "json".to_string(),
            log_enable_color: false,
        }
    }
}

impl NotifierConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            slack_api_url: env_var_or_default_str("SLACK_API_URL", DEFAULT_SLACK_API_URL),
            discord_api_url: env_var_or_default_str("DISCORD_API_URL", DEFAULT_DISCORD_API_URL),
            webex_api_url: env_var_or_default_str("WEBEX_API_URL", DEFAULT_WEBEX_API_URL),
            http_timeout_secs: std::env::var("NOTIFICATION_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
            teams_webhook_validation: env_var_or_default_bool("TEAMS_WEBHOOK_VALIDATION", true),
            teams_webhook_patterns: std::env::var("TEAMS_WEBHOOK_PATTERNS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            log_level: env_var_or_default_str("LOG_LEVEL", "INFO"),
            log_format: env_var_or_default_str("LOG_FORMAT", "json"),
            log_enable_color: env_var_or_default_bool("LOG_ENABLE_COLOR", false),
        }
    }

    /// Get HTTP timeout duration, if one is configured
    #[must_use]
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}

/// Read environment variable as boolean or return default
fn env_var_or_default_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| {
            let v_lower = v.to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
        })
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gmail_address: String,
    pub gmail_app_password: String,
    pub github_token: String,
    pub smtp_host: String,
    pub imap_host: String,
    pub ledger_path: String,
    pub profile_path: Option<String>,
    pub zapier_webhook_url: Option<String>,
    /// Per-call bound for outbound HTTP; there is no automatic retry.
    pub http_timeout_secs: u64,
    /// Inbox poll interval in seconds; 0 disables the poller.
    pub mail_poll_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gmail_address: require_env("GMAIL_ADDRESS")?,
            gmail_app_password: require_env("GMAIL_APP_PASSWORD")?,
            github_token: require_env("GITHUB_TOKEN")?,
            smtp_host: env_or("SMTP_HOST", "smtp.gmail.com"),
            imap_host: env_or("IMAP_HOST", "imap.gmail.com"),
            ledger_path: env_or("LEDGER_PATH", "applications.json"),
            profile_path: std::env::var("PROFILE_PATH").ok(),
            zapier_webhook_url: std::env::var("ZAPIER_WEBHOOK_URL").ok(),
            http_timeout_secs: env_or("HTTP_TIMEOUT_SECS", "10")
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a number of seconds")?,
            mail_poll_secs: env_or("MAIL_POLL_SECS", "0")
                .parse::<u64>()
                .context("MAIL_POLL_SECS must be a number of seconds")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

//! Process configuration loaded from the environment

use anyhow::{Result, bail};

pub const DEFAULT_BASE_URL: &str = "https://letterboxd.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token from `TELEGRAM_BOT_TOKEN`
    pub bot_token: String,
    /// Site origin, without a trailing slash
    pub base_url: String,
    pub user_agent: String,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = match lookup("TELEGRAM_BOT_TOKEN") {
            Some(token) if !token.trim().is_empty() => token.trim().to_string(),
            _ => bail!("TELEGRAM_BOT_TOKEN is not set"),
        };

        let base_url = lookup("LETTERBOXD_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let user_agent = lookup("SCRAPER_USER_AGENT")
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            bot_token,
            base_url,
            user_agent,
        })
    }
}

use anyhow::{Context, Result};

const DEFAULT_ADVISOR_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_ADVISOR_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const PLACEHOLDER_KEY: &str = "your_api_key_here";

/// Application configuration loaded from environment variables.
/// Fails at startup only when a present variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub advisor_api_key: Option<String>,
    pub advisor_model: String,
    pub advisor_api_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            advisor_api_key: optional_env("ADVISOR_API_KEY"),
            advisor_model: optional_env("ADVISOR_MODEL")
                .unwrap_or_else(|| DEFAULT_ADVISOR_MODEL.to_string()),
            advisor_api_url: optional_env("ADVISOR_API_URL")
                .unwrap_or_else(|| DEFAULT_ADVISOR_API_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The one place that decides whether the advisory service can be called.
    pub fn advisor_configured(&self) -> bool {
        self.advisor_api_key
            .as_deref()
            .map(|k| !k.is_empty() && k != PLACEHOLDER_KEY)
            .unwrap_or(false)
    }

    /// Shows the first 6 and last 4 characters of the key, never the whole thing.
    pub fn masked_advisor_key(&self) -> String {
        match self.advisor_api_key.as_deref() {
            Some(key) if self.advisor_configured() && key.chars().count() > 10 => {
                let chars: Vec<char> = key.chars().collect();
                let head: String = chars[..6].iter().collect();
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("{head}...{tail}")
            }
            _ => "Not Configured".to_string(),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
        .filter(|v| !v.is_empty())
}

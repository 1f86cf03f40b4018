use std::{env, fmt, fs, path::Path, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(600);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const REQUIRED_VARS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Typed configuration for the bot.
///
/// Only the three credentials are required; everything else has the defaults
/// the bot has always run with.
#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: ChatId,

    pub endpoint: String,
    pub retry_period: Duration,
    pub http_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("endpoint", &self.endpoint)
            .field("retry_period", &self.retry_period)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let values =
            REQUIRED_VARS.map(|key| lookup(key).and_then(non_empty).map(|v| v.trim().to_string()));
        let [practicum_token, telegram_token, raw_chat_id] = match values {
            [Some(p), Some(t), Some(c)] => [p, t, c],
            values => {
                let missing: Vec<&str> = REQUIRED_VARS
                    .iter()
                    .zip(&values)
                    .filter(|(_, v)| v.is_none())
                    .map(|(key, _)| *key)
                    .collect();
                for key in &missing {
                    tracing::error!(critical = true, variable = %key, "required environment variable is missing");
                }
                return Err(Error::Configuration(format!(
                    "missing required environment variables: {}",
                    missing.join(", ")
                )));
            }
        };

        let chat_id = raw_chat_id
            .trim()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| {
                tracing::error!(critical = true, "TELEGRAM_CHAT_ID is not a numeric chat id");
                Error::Configuration(format!(
                    "TELEGRAM_CHAT_ID must be a numeric chat id, got {raw_chat_id:?}"
                ))
            })?;

        let endpoint = lookup("PRACTICUM_ENDPOINT")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let retry_period = parse_secs(lookup("RETRY_PERIOD_SECS")).unwrap_or(DEFAULT_RETRY_PERIOD);
        let http_timeout = parse_secs(lookup("HTTP_TIMEOUT_SECS")).unwrap_or(DEFAULT_HTTP_TIMEOUT);

        Ok(Self {
            practicum_token,
            telegram_token,
            chat_id,
            endpoint,
            retry_period,
            http_timeout,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Some(entries) = read_dotenv(path) else {
        return;
    };

    for (key, val) in unset_entries(entries, |key| env::var_os(key).is_some()) {
        env::set_var(key, val);
    }
}

fn read_dotenv(path: &Path) -> Option<Vec<(String, String)>> {
    let iter = dotenv::from_path_iter(path).ok()?;
    let entries = iter
        .filter_map(|item| match item {
            Ok(pair) => Some(pair),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "skipping malformed .env line");
                None
            }
        })
        .collect();
    Some(entries)
}

/// Keep only the entries whose key is not already set; existing env wins.
fn unset_entries(
    entries: Vec<(String, String)>,
    is_set: impl Fn(&str) -> bool,
) -> Vec<(String, String)> {
    entries
        .into_iter()
        .filter(|(key, _)| !is_set(key))
        .collect()
}

fn parse_secs(v: Option<String>) -> Option<Duration> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

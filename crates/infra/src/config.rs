use chrono_tz::Tz;
use std::{fmt::Display, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
/// UTC+6 all year round, so naive webinar dates are never ambiguous
const DEFAULT_LOCAL_TIMEZONE: &str = "Etc/GMT-6";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("The {0} environment variable must be set")]
    Missing(&'static str),
    #[error("The {name} environment variable is not a valid url: `{value}`")]
    InvalidUrl { name: &'static str, value: String },
    #[error("The {name} environment variable is not a known IANA timezone: `{value}`")]
    InvalidTimezone { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Base url of the project, e.g. `https://xyz.supabase.co`
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_url: String,
    pub bot_token: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase: SupabaseConfig,
    pub telegram: TelegramConfig,
    /// Timezone of the organization. Webinar dates stored without an offset
    /// are wall-clock times in this zone and reminder texts display times in it.
    pub local_timezone: Tz,
    /// How often all reminders are rebuilt from the registration store.
    /// This is also what picks up webinars whose date was edited.
    pub reminders_sync_interval: Duration,
    /// Upper bound on how long the job scheduler sleeps between polls
    pub job_scheduler_poll_interval: Duration,
    /// How long keys of fired reminders are remembered to reject resubmissions
    pub fired_reminders_retention: Duration,
    /// Timeout for every request against the store and the messaging api
    pub http_timeout: Duration,
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        let supabase = SupabaseConfig {
            url: required_url("SUPABASE_URL")?,
            api_key: required("SUPABASE_API_KEY")?,
        };
        let telegram_api_url = match std::env::var("TELEGRAM_API_URL") {
            Ok(url) => validate_url("TELEGRAM_API_URL", url)?,
            Err(_) => DEFAULT_TELEGRAM_API_URL.to_string(),
        };
        let telegram = TelegramConfig {
            api_url: telegram_api_url,
            bot_token: required("TELEGRAM_BOT_TOKEN")?,
        };

        let timezone = std::env::var("LOCAL_TIMEZONE").unwrap_or_else(|_| {
            info!(
                "Did not find LOCAL_TIMEZONE environment variable. Going to use {}.",
                DEFAULT_LOCAL_TIMEZONE
            );
            DEFAULT_LOCAL_TIMEZONE.into()
        });
        let local_timezone = timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone {
                name: "LOCAL_TIMEZONE",
                value: timezone.clone(),
            })?;

        let mut config = Self::with_credentials(supabase, telegram);
        config.local_timezone = local_timezone;
        config.reminders_sync_interval = Duration::from_secs(
            env_or("REMINDERS_SYNC_INTERVAL_MINUTES", 30u64).saturating_mul(60),
        );
        config.job_scheduler_poll_interval =
            Duration::from_secs(at_least_one("JOB_SCHEDULER_POLL_INTERVAL_SECS", 30u64));
        config.http_timeout = Duration::from_secs(env_or("HTTP_TIMEOUT_SECS", 10u64));
        Ok(config)
    }

    /// Config with default settings for everything except the credentials
    pub fn with_credentials(supabase: SupabaseConfig, telegram: TelegramConfig) -> Self {
        Self {
            supabase,
            telegram,
            local_timezone: chrono_tz::Etc::GMTMinus6,
            reminders_sync_interval: Duration::from_secs(30 * 60), // 30 minutes
            job_scheduler_poll_interval: Duration::from_secs(30),
            fired_reminders_retention: Duration::from_secs(2 * 60 * 60), // 2 hours
            http_timeout: Duration::from_secs(10),
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn required_url(name: &'static str) -> Result<String, ConfigError> {
    validate_url(name, required(name)?)
}

fn validate_url(name: &'static str, value: String) -> Result<String, ConfigError> {
    match url::Url::parse(&value) {
        Ok(parsed) if ["http", "https"].contains(&parsed.scheme()) => {
            Ok(value.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::InvalidUrl { name, value }),
    }
}

fn env_or<T: FromStr + Display + Copy>(name: &'static str, default: T) -> T {
    let value = match std::env::var(name) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                name, value, default
            );
            default
        }
    }
}

/// Like `env_or` for values where zero would make a loop spin
fn at_least_one(name: &'static str, default: u64) -> u64 {
    match env_or(name, default) {
        0 => {
            warn!("The given {}: 0 is too small, using 1 instead.", name);
            1
        }
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 8] = [
        "SUPABASE_URL",
        "SUPABASE_API_KEY",
        "TELEGRAM_BOT_TOKEN",
        "TELEGRAM_API_URL",
        "LOCAL_TIMEZONE",
        "REMINDERS_SYNC_INTERVAL_MINUTES",
        "JOB_SCHEDULER_POLL_INTERVAL_SECS",
        "HTTP_TIMEOUT_SECS",
    ];

    fn reset_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
        std::env::set_var("SUPABASE_URL", "https://project.supabase.co/");
        std::env::set_var("SUPABASE_API_KEY", "service-key");
        std::env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");
    }

    #[test]
    #[serial]
    fn it_reads_credentials_and_defaults() {
        reset_env();
        let config = Config::new().unwrap();
        assert_eq!(config.supabase.url, "https://project.supabase.co");
        assert_eq!(config.supabase.api_key, "service-key");
        assert_eq!(config.telegram.api_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.local_timezone, chrono_tz::Etc::GMTMinus6);
        assert_eq!(config.reminders_sync_interval, Duration::from_secs(30 * 60));
    }

    #[test]
    #[serial]
    fn it_reports_missing_credentials() {
        reset_env();
        std::env::remove_var("TELEGRAM_BOT_TOKEN");
        assert_eq!(
            Config::new().unwrap_err(),
            ConfigError::Missing("TELEGRAM_BOT_TOKEN")
        );
    }

    #[test]
    #[serial]
    fn it_rejects_invalid_urls_and_timezones() {
        reset_env();
        std::env::set_var("SUPABASE_URL", "not a url");
        assert!(matches!(
            Config::new(),
            Err(ConfigError::InvalidUrl { name: "SUPABASE_URL", .. })
        ));

        reset_env();
        std::env::set_var("LOCAL_TIMEZONE", "Mars/Olympus");
        assert!(matches!(
            Config::new(),
            Err(ConfigError::InvalidTimezone { .. })
        ));
    }

    #[test]
    #[serial]
    fn invalid_intervals_fall_back_to_defaults() {
        reset_env();
        std::env::set_var("LOCAL_TIMEZONE", "Asia/Dhaka");
        std::env::set_var("REMINDERS_SYNC_INTERVAL_MINUTES", "five");
        std::env::set_var("HTTP_TIMEOUT_SECS", "3");
        let config = Config::new().unwrap();
        assert_eq!(config.local_timezone, chrono_tz::Asia::Dhaka);
        assert_eq!(config.reminders_sync_interval, Duration::from_secs(30 * 60));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    #[serial]
    fn out_of_range_intervals_are_clamped() {
        reset_env();
        std::env::set_var("JOB_SCHEDULER_POLL_INTERVAL_SECS", "0");
        std::env::set_var(
            "REMINDERS_SYNC_INTERVAL_MINUTES",
            u64::MAX.to_string(),
        );
        let config = Config::new().unwrap();
        assert_eq!(config.job_scheduler_poll_interval, Duration::from_secs(1));
        assert_eq!(config.reminders_sync_interval, Duration::from_secs(u64::MAX));
    }
}

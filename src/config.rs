use anyhow::{anyhow, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use tokio_cron_scheduler::Job;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/guesthouse.db";
/// 08:30 Moscow time expressed in UTC.
const DEFAULT_COMPLETION_CRON: &str = "0 30 5 * * *";
/// 08:32 Moscow time expressed in UTC.
const DEFAULT_DIGEST_CRON: &str = "0 32 5 * * *";
const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;

/// When a live booking is considered finished by the daily completion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Complete once the check-out date is in the past.
    #[default]
    AfterCheckout,
    /// Complete once the check-in date is in the past.
    AfterCheckin,
}

impl FromStr for CompletionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "checkout" | "check-out" => Ok(CompletionPolicy::AfterCheckout),
            "checkin" | "check-in" => Ok(CompletionPolicy::AfterCheckin),
            other => Err(anyhow!(
                "Invalid COMPLETION_POLICY '{}': expected 'checkout' or 'checkin'",
                other
            )),
        }
    }
}

impl fmt::Display for CompletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionPolicy::AfterCheckout => write!(f, "checkout"),
            CompletionPolicy::AfterCheckin => write!(f, "checkin"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub admin_ids: Vec<i64>,
    pub completion_policy: CompletionPolicy,
    pub completion_cron: String,
    pub digest_cron: String,
    pub utc_offset_hours: i32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = database_url_from_env();

        let http_port = match non_empty_var("HTTP_PORT") {
            Some(port) => port.trim().parse().map_err(|_| anyhow!("Invalid HTTP_PORT"))?,
            None => 3000,
        };

        let admin_ids = parse_admin_ids(&env::var("ADMIN_IDS").unwrap_or_default());
        if admin_ids.is_empty() {
            tracing::warn!("ADMIN_IDS is empty, nobody will be able to manage bookings");
        }

        let completion_policy = match non_empty_var("COMPLETION_POLICY") {
            Some(policy) => policy.parse()?,
            None => CompletionPolicy::default(),
        };

        let utc_offset_hours = match non_empty_var("UTC_OFFSET_HOURS") {
            Some(offset) => parse_utc_offset(&offset)?,
            None => DEFAULT_UTC_OFFSET_HOURS,
        };

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            admin_ids,
            completion_policy,
            completion_cron: cron_var("COMPLETION_CRON", DEFAULT_COMPLETION_CRON)?,
            digest_cron: cron_var("DIGEST_CRON", DEFAULT_DIGEST_CRON)?,
            utc_offset_hours,
        })
    }
}

/// `DATABASE_URL`, or the default SQLite file under `./data`.
pub fn database_url_from_env() -> String {
    non_empty_var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// A cron schedule from the environment, checked the way the job scheduler parses it.
fn cron_var(name: &str, default: &str) -> Result<String> {
    let expression = non_empty_var(name).unwrap_or_else(|| default.to_string());
    validate_cron(&expression).map_err(|e| anyhow!("Invalid {name} '{expression}': {e}"))?;
    Ok(expression)
}

pub fn validate_cron(expression: &str) -> Result<()> {
    Job::new(expression, |_, _| {})
        .map(|_| ())
        .map_err(|e| anyhow!("{e:?}"))
}

fn parse_utc_offset(raw: &str) -> Result<i32> {
    let offset: i32 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid UTC_OFFSET_HOURS"))?;
    if !(-12..=14).contains(&offset) {
        return Err(anyhow!("UTC_OFFSET_HOURS must be between -12 and 14"));
    }
    Ok(offset)
}

/// Parses a comma separated list of Telegram user ids, skipping bad entries.
pub fn parse_admin_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|id| {
            let trimmed = id.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<i64>() {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(value = trimmed, error = %err, "invalid ADMIN_IDS entry");
                    None
                }
            }
        })
        .collect()
}

use guesthouse_bot::config::{CompletionPolicy, Config};
use std::env;
use std::sync::Mutex;

// Config tests share process environment, so they run one at a time.
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const VARS: &[&str] = &[
    "TELEGRAM_BOT_TOKEN",
    "DATABASE_URL",
    "HTTP_PORT",
    "ADMIN_IDS",
    "COMPLETION_POLICY",
    "COMPLETION_CRON",
    "DIGEST_CRON",
    "UTC_OFFSET_HOURS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("ADMIN_IDS", "111, 222");
    env::set_var("COMPLETION_POLICY", "checkin");
    env::set_var("COMPLETION_CRON", "0 0 6 * * *");
    env::set_var("DIGEST_CRON", "0 5 6 * * *");
    env::set_var("UTC_OFFSET_HOURS", "5");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.admin_ids, vec![111, 222]);
    assert_eq!(config.completion_policy, CompletionPolicy::AfterCheckin);
    assert_eq!(config.completion_cron, "0 0 6 * * *");
    assert_eq!(config.digest_cron, "0 5 6 * * *");
    assert_eq!(config.utc_offset_hours, 5);

    clear_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "required_token");
    assert_eq!(config.database_url, "sqlite:./data/guesthouse.db");
    assert_eq!(config.http_port, 3000);
    assert!(config.admin_ids.is_empty());
    assert_eq!(config.completion_policy, CompletionPolicy::AfterCheckout);
    assert_eq!(config.completion_cron, "0 30 5 * * *");
    assert_eq!(config.digest_cron, "0 32 5 * * *");
    assert_eq!(config.utc_offset_hours, 3);

    clear_env();
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("TELEGRAM_BOT_TOKEN must be set"));

    env::set_var("TELEGRAM_BOT_TOKEN", "   ");
    assert!(Config::from_env().is_err());

    clear_env();
}

#[test]
fn test_config_invalid_port() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    for port in ["invalid_port", "-1", "65536"] {
        env::set_var("HTTP_PORT", port);
        let error_msg = Config::from_env().unwrap_err().to_string();
        assert!(error_msg.contains("Invalid HTTP_PORT"), "port {port}: {error_msg}");
    }

    env::set_var("HTTP_PORT", "  65535  ");
    assert_eq!(Config::from_env().unwrap().http_port, 65535);

    clear_env();
}

#[test]
fn test_config_invalid_policy_and_offset() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");

    env::set_var("COMPLETION_POLICY", "weekly");
    assert!(Config::from_env().is_err());
    env::remove_var("COMPLETION_POLICY");

    env::set_var("UTC_OFFSET_HOURS", "20");
    assert!(Config::from_env().is_err());
    env::set_var("UTC_OFFSET_HOURS", "-3");
    assert_eq!(Config::from_env().unwrap().utc_offset_hours, -3);

    clear_env();
}

#[test]
fn test_config_rejects_invalid_cron() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("COMPLETION_CRON", "every morning");
    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("COMPLETION_CRON"));

    env::remove_var("COMPLETION_CRON");
    env::set_var("DIGEST_CRON", "0 32 25 * * *");
    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("DIGEST_CRON"));

    clear_env();
}

#[test]
fn test_config_skips_bad_admin_ids() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("ADMIN_IDS", "12345,not-a-number,,67890");

    let config = Config::from_env().unwrap();
    assert_eq!(config.admin_ids, vec![12345, 67890]);

    clear_env();
}

#[test]
fn test_config_empty_values_use_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "valid_token");
    env::set_var("DATABASE_URL", "");
    env::set_var("HTTP_PORT", "");
    env::set_var("COMPLETION_CRON", " ");

    let config = Config::from_env().unwrap();
    assert_eq!(config.database_url, "sqlite:./data/guesthouse.db");
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.completion_cron, "0 30 5 * * *");

    clear_env();
}

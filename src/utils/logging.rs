use tracing::{debug, error, info, warn};

/// Logs an admin action as it starts.
pub fn log_command_start(command: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(command, user_id, chat_id, "CMD_START: {}", d),
        None => info!(command, user_id, chat_id, "CMD_START"),
    }
}

/// Logs an admin action that finished successfully.
pub fn log_command_success(command: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(command, user_id, chat_id, "CMD_SUCCESS: {}", d),
        None => info!(command, user_id, chat_id, "CMD_SUCCESS"),
    }
}

pub fn log_command_error(command: &str, user_id: i64, chat_id: i64, error: &str) {
    error!(command, user_id, chat_id, "CMD_ERROR: {}", error);
}

/// Logs rejected wizard input.
pub fn log_validation_error(step: &str, value: &str, error: &str, user_id: i64) {
    warn!(step, user_id, "VALIDATION_ERROR: '{}' rejected: {}", value, error);
}

pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

pub fn log_database_error(operation: &str, table: &str, error: &str, details: Option<&str>) {
    match details {
        Some(d) => error!("DB_ERROR: {} on {} failed: {} - {}", operation, table, error, d),
        None => error!("DB_ERROR: {} on {} failed: {}", operation, table, error),
    }
}

pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}

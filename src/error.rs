use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by availability checks and booking mutations.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("check-in {start} must be before check-out {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("room {0} does not exist")]
    RoomNotFound(i64),

    #[error("booking {0} does not exist")]
    BookingNotFound(i64),

    #[error("room {room_id} is already booked between {start} and {end}")]
    Unavailable {
        room_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("booking {id} is {status} and cannot be changed")]
    InvalidTransition { id: i64, status: String },

    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl BookingError {
    /// Whether the error was caused by user input rather than storage.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, BookingError::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default();
        assert!(BookingError::InvalidRange { start: day, end: day }.is_user_error());
        assert!(BookingError::RoomNotFound(7).is_user_error());
        assert!(!BookingError::Database(sqlx::Error::RowNotFound).is_user_error());
    }

    #[test]
    fn test_error_messages() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap_or_default();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default();
        let err = BookingError::InvalidRange { start, end };
        assert_eq!(err.to_string(), "check-in 2024-03-05 must be before check-out 2024-03-01");
        assert_eq!(BookingError::RoomNotFound(3).to_string(), "room 3 does not exist");
    }
}

use chrono::NaiveDate;
use guesthouse_bot::bot::wizard::WizardError;
use guesthouse_bot::error::BookingError;
use guesthouse_bot::utils::feedback::*;

#[cfg(test)]
mod feedback_system_tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_feedback_message_formatting() {
        let test_cases = [
            (FeedbackType::Success, "Booking №3 created.", "✅ Booking №3 created\\."),
            (FeedbackType::Warning, "Room #2 is taken", "⚠️ Room \\#2 is taken"),
            (FeedbackType::Error, "Storage error", "❌ Storage error"),
            (FeedbackType::Info, "Dialog canceled.", "ℹ️ Dialog canceled\\."),
        ];

        for (feedback_type, message, expected) in test_cases {
            assert_eq!(format_feedback(feedback_type, message), expected);
        }
    }

    #[test]
    fn test_every_booking_error_has_a_message() {
        let errors = [
            BookingError::InvalidRange { start: date(2024, 3, 5), end: date(2024, 3, 1) },
            BookingError::RoomNotFound(9),
            BookingError::BookingNotFound(12),
            BookingError::Unavailable { room_id: 2, start: date(2024, 3, 1), end: date(2024, 3, 4) },
            BookingError::InvalidTransition { id: 5, status: "canceled".to_string() },
            BookingError::InvalidAmount(0),
            BookingError::Database(sqlx::Error::PoolClosed),
        ];

        for error in &errors {
            let text = describe_booking_error(error);
            assert!(!text.is_empty());
            assert!(text.ends_with('.'), "{text}");
        }
    }

    #[test]
    fn test_booking_error_messages() {
        assert_eq!(describe_booking_error(&BookingError::RoomNotFound(9)), "Room #9 does not exist.");
        assert_eq!(
            describe_booking_error(&BookingError::InvalidTransition { id: 5, status: "canceled".to_string() }),
            "Booking #5 is already canceled."
        );
        assert_eq!(
            describe_booking_error(&BookingError::InvalidRange { start: date(2024, 3, 5), end: date(2024, 3, 1) }),
            "Check-out (01.03.2024) must be after check-in (05.03.2024)."
        );
    }

    #[test]
    fn test_wizard_error_messages() {
        assert_eq!(
            describe_wizard_error(&WizardError::InvalidCost(0)),
            "Cost must be greater than zero, got 0."
        );
        assert!(describe_wizard_error(&WizardError::Unavailable).contains("Pick other dates"));
        assert!(describe_wizard_error(&WizardError::UnexpectedInput { step: "room", input: "cost" })
            .contains("/cancel"));
    }

    #[test]
    fn test_user_errors_versus_storage_errors() {
        assert!(BookingError::InvalidAmount(-5).is_user_error());
        assert!(!BookingError::Database(sqlx::Error::PoolTimedOut).is_user_error());
    }

    #[test]
    fn test_storage_errors_are_reported_as_errors() {
        assert_eq!(
            booking_error_tone(&BookingError::Database(sqlx::Error::PoolTimedOut)),
            FeedbackType::Error
        );
        assert_eq!(booking_error_tone(&BookingError::BookingNotFound(4)), FeedbackType::Warning);
        assert_eq!(
            booking_error_tone(&BookingError::Unavailable {
                room_id: 1,
                start: date(2024, 3, 1),
                end: date(2024, 3, 4),
            }),
            FeedbackType::Warning
        );
    }
}

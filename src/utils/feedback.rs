use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, ParseMode};

use crate::bot::wizard::WizardError;
use crate::error::BookingError;
use crate::utils::datetime::format_date;
use crate::utils::markdown::escape_markdown;

/// Tone of a reply sent back to the admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
}

impl FeedbackType {
    pub fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
        }
    }
}

/// Formats a feedback line as MarkdownV2.
pub fn format_feedback(feedback_type: FeedbackType, message: &str) -> String {
    format!("{} {}", feedback_type.emoji(), escape_markdown(message))
}

/// Text shown to the admin for a failed booking operation.
/// Input problems are warnings; storage failures are errors.
pub fn booking_error_tone(error: &BookingError) -> FeedbackType {
    if error.is_user_error() {
        FeedbackType::Warning
    } else {
        FeedbackType::Error
    }
}

pub fn describe_booking_error(error: &BookingError) -> String {
    match error {
        BookingError::InvalidRange { start, end } => format!(
            "Check-out ({}) must be after check-in ({}).",
            format_date(end),
            format_date(start)
        ),
        BookingError::RoomNotFound(room_id) => format!("Room #{room_id} does not exist."),
        BookingError::BookingNotFound(id) => format!("Booking #{id} no longer exists."),
        BookingError::Unavailable { room_id, start, end } => format!(
            "Room #{} is already booked for some of the nights {} – {}.",
            room_id,
            format_date(start),
            format_date(end)
        ),
        BookingError::InvalidTransition { id, status } => {
            format!("Booking #{id} is already {status}.")
        }
        BookingError::InvalidAmount(amount) => {
            format!("Amount must be greater than zero, got {amount}.")
        }
        BookingError::Database(_) => "Storage error, please try again later.".to_string(),
    }
}

/// Text shown when the booking wizard refuses an input.
pub fn describe_wizard_error(error: &WizardError) -> String {
    match error {
        WizardError::UnexpectedInput { .. } => {
            "That does not fit the current step. Use the buttons or /cancel.".to_string()
        }
        WizardError::InvalidRange { start, end } => format!(
            "Check-out ({}) must be after check-in ({}).",
            format_date(end),
            format_date(start)
        ),
        WizardError::Unavailable => {
            "The room is already booked for some of these nights. Pick other dates.".to_string()
        }
        WizardError::InvalidCost(cost) => format!("Cost must be greater than zero, got {cost}."),
    }
}

/// Sends consistently formatted replies to one chat.
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
}

impl CommandFeedback {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, format_feedback(feedback_type, message))
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    /// Sends feedback with an inline keyboard under it.
    pub async fn send_with_keyboard(
        &self,
        feedback_type: FeedbackType,
        message: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, format_feedback(feedback_type, message))
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(keyboard)
            .await
    }

    pub async fn success(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn error(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn warning(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Warning, message).await
    }

    pub async fn info(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Info, message).await
    }

    /// Error with a hint on how to fix the input.
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> ResponseResult<Message> {
        let message = format!("{error}\n\n💡 {suggestion}");
        self.send(FeedbackType::Error, &message).await
    }

    pub async fn booking_error(&self, error: &BookingError) -> ResponseResult<Message> {
        let message = describe_booking_error(error);
        match booking_error_tone(error) {
            FeedbackType::Warning => self.warning(&message).await,
            _ => self.error(&message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_feedback_type_emojis() {
        assert_eq!(FeedbackType::Success.emoji(), "✅");
        assert_eq!(FeedbackType::Warning.emoji(), "⚠️");
        assert_eq!(FeedbackType::Error.emoji(), "❌");
        assert_eq!(FeedbackType::Info.emoji(), "ℹ️");
    }

    #[test]
    fn test_format_feedback_escapes_message() {
        assert_eq!(
            format_feedback(FeedbackType::Success, "Payment 500 added."),
            "✅ Payment 500 added\\."
        );
    }

    #[test]
    fn test_describe_unavailable() {
        let error = BookingError::Unavailable {
            room_id: 2,
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        };
        assert_eq!(
            describe_booking_error(&error),
            "Room #2 is already booked for some of the nights 01.03.2024 – 04.03.2024."
        );
    }

    #[test]
    fn test_describe_wizard_range_error() {
        let error = WizardError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        };
        assert_eq!(
            describe_wizard_error(&error),
            "Check-out (04.03.2024) must be after check-in (04.03.2024)."
        );
    }

    #[test]
    fn test_database_errors_are_not_leaked() {
        let error = BookingError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(describe_booking_error(&error), "Storage error, please try again later.");
    }
}

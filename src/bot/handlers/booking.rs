//! Runs the booking wizard over Telegram: turns admin input into
//! [`WizardEvent`]s, feeds them to [`transition`] and carries out the result.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, ParseMode};

use crate::bot::callback_data::CallbackAction;
use crate::bot::context::AppContext;
use crate::bot::handlers::{browse, HandlerError, HandlerResult};
use crate::bot::keyboards;
use crate::bot::render;
use crate::bot::state::{BotDialogue, ConversationState};
use crate::bot::wizard::{transition, BookingWizard, GuestProfile, Transition, WizardEvent, WizardStep};
use crate::database::models::{BookingDetails, Guest, NewBooking, Room};
use crate::error::BookingError;
use crate::utils::datetime::parse_date;
use crate::utils::feedback::{describe_wizard_error, CommandFeedback};
use crate::utils::logging::{log_command_error, log_command_start, log_command_success, log_validation_error};
use crate::utils::validation::{normalize_phone, parse_amount, validate_description, validate_guest_name};

/// Text typed at a wizard step, parsed but not yet checked against storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    Phone(String),
    Name(String),
    Description(String),
    StartDate(NaiveDate),
    EndDate(NaiveDate),
    Cost(i64),
}

/// Parses `text` for the step the wizard is waiting on.
pub fn parse_step_input(state: &BookingWizard, text: &str, today: NaiveDate) -> Result<StepInput> {
    match state {
        BookingWizard::Phone => Ok(StepInput::Phone(normalize_phone(text)?)),
        BookingWizard::Name { .. } => Ok(StepInput::Name(validate_guest_name(text)?)),
        BookingWizard::Description { .. } => {
            let description = validate_description(text)?;
            if description == "-" {
                Ok(StepInput::Description(String::new()))
            } else {
                Ok(StepInput::Description(description))
            }
        }
        BookingWizard::StartDate { .. } => {
            let date = parse_date(text)?;
            if date < today {
                return Err(anyhow!("Check-in date cannot be in the past"));
            }
            Ok(StepInput::StartDate(date))
        }
        BookingWizard::EndDate { .. } => Ok(StepInput::EndDate(parse_date(text)?)),
        BookingWizard::Cost { .. } => Ok(StepInput::Cost(parse_amount(text)?)),
        BookingWizard::ReturningGuest { .. }
        | BookingWizard::NewGuest { .. }
        | BookingWizard::Room { .. }
        | BookingWizard::Confirmation { .. } => {
            Err(anyhow!("Please answer with the buttons under the last message"))
        }
    }
}

/// Hint shown next to a rejected input.
pub fn input_hint(state: &BookingWizard) -> &'static str {
    match state {
        BookingWizard::Phone => "Example: +7 912 345-67-89",
        BookingWizard::Name { .. } => "Send just the name, e.g. Anna Petrova",
        BookingWizard::Description { .. } => "Keep it under 500 characters, or send '-'",
        BookingWizard::StartDate { .. } | BookingWizard::EndDate { .. } => {
            "Use DD.MM.YYYY, e.g. 01.03.2024"
        }
        BookingWizard::Cost { .. } => "Send a whole number of rubles, e.g. 9000",
        _ => "Use the buttons, or /cancel to start over",
    }
}

/// Maps a wizard button to the event it stands for. Buttons sent for
/// another step than `current` map to nothing.
pub fn button_event(action: CallbackAction, current: WizardStep) -> Option<WizardEvent> {
    match action {
        CallbackAction::WizardYes(step) if step == current => Some(WizardEvent::Confirmed),
        CallbackAction::WizardNo(step) if step == current => Some(WizardEvent::Rejected),
        CallbackAction::WizardBack(step) if step == current => Some(WizardEvent::Back),
        CallbackAction::WizardCancel => Some(WizardEvent::Cancel),
        CallbackAction::WizardRoom(room_id) => Some(WizardEvent::RoomSelected(room_id)),
        _ => None,
    }
}

/// Completes a parsed input with the lookups its step needs.
async fn resolve_event(
    ctx: &AppContext,
    state: &BookingWizard,
    input: StepInput,
) -> Result<WizardEvent, BookingError> {
    let event = match input {
        StepInput::Phone(phone) => {
            let known_guest = Guest::find_by_phone(&ctx.db.pool, &phone)
                .await?
                .map(GuestProfile::from);
            WizardEvent::PhoneEntered { phone, known_guest }
        }
        StepInput::Name(name) => WizardEvent::NameEntered(name),
        StepInput::Description(description) => WizardEvent::DescriptionEntered(description),
        StepInput::StartDate(date) => WizardEvent::StartDateEntered(date),
        StepInput::EndDate(date) => {
            let available = match state {
                BookingWizard::EndDate { room_id, start, .. } if date > *start => {
                    ctx.bookings.is_available(*room_id, *start, date).await?
                }
                // The wizard rejects the range itself.
                _ => false,
            };
            WizardEvent::EndDateEntered { date, available }
        }
        StepInput::Cost(cost) => WizardEvent::CostEntered(cost),
    };
    Ok(event)
}

async fn step_keyboard(
    ctx: &AppContext,
    state: &BookingWizard,
) -> Result<InlineKeyboardMarkup, HandlerError> {
    let keyboard = match state {
        BookingWizard::Room { .. } => keyboards::wizard_rooms(&Room::find_all(&ctx.db.pool).await?),
        state if state.expects_buttons() => keyboards::wizard_confirm(state.step()),
        state => keyboards::wizard_nav(state.step()),
    };
    Ok(keyboard)
}

pub async fn send_step(
    bot: &Bot,
    chat_id: ChatId,
    ctx: &AppContext,
    state: &BookingWizard,
) -> HandlerResult {
    let keyboard = step_keyboard(ctx, state).await?;
    bot.send_message(chat_id, render::wizard_prompt(state))
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

async fn advance(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &BotDialogue,
    ctx: &AppContext,
    next: BookingWizard,
) -> HandlerResult {
    tracing::debug!("Booking wizard in chat {} moved to {}", chat_id, next.step_name());
    dialogue
        .update(ConversationState::Booking(next.clone()))
        .await?;
    send_step(bot, chat_id, ctx, &next).await
}

pub async fn start(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    dialogue: &BotDialogue,
    ctx: &AppContext,
) -> HandlerResult {
    log_command_start("book", user_id, chat_id.0, None);
    advance(bot, chat_id, dialogue, ctx, BookingWizard::Phone).await
}

/// Handles text typed while the wizard is active.
pub async fn handle_text(
    bot: &Bot,
    msg: &Message,
    dialogue: &BotDialogue,
    ctx: &AppContext,
    wizard: BookingWizard,
    text: &str,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let user_id = msg.from().map(|user| user.id.0 as i64).unwrap_or(0);
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    let input = match parse_step_input(&wizard, text, ctx.today()) {
        Ok(input) => input,
        Err(e) => {
            log_validation_error(wizard.step_name(), text, &e.to_string(), user_id);
            feedback
                .validation_error(&e.to_string(), input_hint(&wizard))
                .await?;
            return Ok(());
        }
    };

    let event = match resolve_event(ctx, &wizard, input).await {
        Ok(event) => event,
        Err(e) => {
            log_command_error("book", user_id, chat_id.0, &e.to_string());
            feedback.booking_error(&e).await?;
            return Ok(());
        }
    };

    apply(bot, chat_id, user_id, dialogue, ctx, wizard, event).await
}

/// Handles a wizard button press.
pub async fn handle_button(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    dialogue: &BotDialogue,
    ctx: &AppContext,
    action: CallbackAction,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), chat_id);
    let ConversationState::Booking(wizard) = dialogue.get().await?.unwrap_or_default() else {
        feedback
            .info("This booking dialog is no longer active. Use /book to start a new one.")
            .await?;
        return Ok(());
    };
    let Some(event) = button_event(action, wizard.step()) else {
        tracing::debug!("Stale wizard button {} ignored at step {}", action, wizard.step_name());
        feedback
            .info("That button belongs to an earlier step. Please use the buttons under the last message.")
            .await?;
        return Ok(());
    };

    apply(bot, chat_id, user_id, dialogue, ctx, wizard, event).await
}

async fn apply(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    dialogue: &BotDialogue,
    ctx: &AppContext,
    wizard: BookingWizard,
    event: WizardEvent,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    match transition(wizard.clone(), event) {
        Err(e) => {
            log_validation_error(wizard.step_name(), "-", &e.to_string(), user_id);
            feedback.warning(&describe_wizard_error(&e)).await?;
        }
        Ok(Transition::Next(next)) => advance(bot, chat_id, dialogue, ctx, next).await?,
        Ok(Transition::SaveGuest { guest, next }) => {
            Guest::upsert(&ctx.db.pool, &guest.phone, &guest.name, &guest.description).await?;
            tracing::info!("Guest {} saved by admin {}", guest.phone, user_id);
            advance(bot, chat_id, dialogue, ctx, next).await?;
        }
        Ok(Transition::Retry { next, reason }) => {
            feedback.warning(&describe_wizard_error(&reason)).await?;
            advance(bot, chat_id, dialogue, ctx, next).await?;
        }
        Ok(Transition::Submit(new_booking)) => {
            submit(bot, chat_id, user_id, dialogue, ctx, wizard, new_booking).await?;
        }
        Ok(Transition::Abort) => {
            dialogue.exit().await?;
            feedback.info("Booking canceled.").await?;
            browse::send_main_menu(bot, chat_id).await?;
        }
    }

    Ok(())
}

async fn submit(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    dialogue: &BotDialogue,
    ctx: &AppContext,
    wizard: BookingWizard,
    new_booking: NewBooking,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    match ctx.bookings.create_booking(&new_booking).await {
        Ok(booking) => {
            dialogue.exit().await?;
            log_command_success("book", user_id, chat_id.0, Some(&format!("booking {}", booking.id)));
            feedback
                .success(&format!("Booking №{} created.", booking.id))
                .await?;

            match BookingDetails::find_by_id(&ctx.db.pool, booking.id).await? {
                Some(details) => {
                    bot.send_message(chat_id, render::booking_card(&details))
                        .parse_mode(ParseMode::MarkdownV2)
                        .reply_markup(keyboards::booking_actions(&details, true))
                        .await?;
                }
                None => browse::send_main_menu(bot, chat_id).await?,
            }
        }
        // Someone took the dates after the availability check: pick new ones.
        Err(e @ BookingError::Unavailable { .. }) => {
            log_command_error("book", user_id, chat_id.0, &e.to_string());
            feedback.booking_error(&e).await?;
            match wizard {
                BookingWizard::Confirmation { guest, room_id, .. } => {
                    advance(bot, chat_id, dialogue, ctx, BookingWizard::StartDate { guest, room_id })
                        .await?;
                }
                _ => {
                    dialogue.exit().await?;
                    browse::send_main_menu(bot, chat_id).await?;
                }
            }
        }
        Err(e) => {
            log_command_error("book", user_id, chat_id.0, &e.to_string());
            feedback.booking_error(&e).await?;
            dialogue.exit().await?;
            browse::send_main_menu(bot, chat_id).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::availability::Stay;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn guest() -> GuestProfile {
        GuestProfile {
            phone: "79123456789".to_string(),
            name: "Anna".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_phone_step_normalizes() {
        let input = parse_step_input(&BookingWizard::Phone, "8 (912) 345-67-89", date(2024, 1, 1));
        assert_eq!(input.unwrap(), StepInput::Phone("79123456789".to_string()));
    }

    #[test]
    fn test_dash_means_no_description() {
        let state = BookingWizard::Description { phone: "79123456789".into(), name: "Anna".into() };
        let input = parse_step_input(&state, " - ", date(2024, 1, 1)).unwrap();
        assert_eq!(input, StepInput::Description(String::new()));
    }

    #[test]
    fn test_check_in_in_the_past_rejected() {
        let state = BookingWizard::StartDate { guest: guest(), room_id: 1 };
        let today = date(2024, 3, 10);
        assert!(parse_step_input(&state, "09.03.2024", today).is_err());
        assert_eq!(
            parse_step_input(&state, "10.03.2024", today).unwrap(),
            StepInput::StartDate(today)
        );
    }

    #[test]
    fn test_check_out_accepts_any_valid_date() {
        let state = BookingWizard::EndDate { guest: guest(), room_id: 1, start: date(2024, 3, 10) };
        // Ordering against check-in is the wizard's job.
        assert_eq!(
            parse_step_input(&state, "01.03.2024", date(2024, 3, 1)).unwrap(),
            StepInput::EndDate(date(2024, 3, 1))
        );
    }

    #[test]
    fn test_cost_step_parses_amount() {
        let state = BookingWizard::Cost {
            guest: guest(),
            room_id: 1,
            stay: Stay { start: date(2024, 3, 1), end: date(2024, 3, 4) },
        };
        assert_eq!(
            parse_step_input(&state, "12 500", date(2024, 1, 1)).unwrap(),
            StepInput::Cost(12500)
        );
        assert!(parse_step_input(&state, "free", date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_button_steps_reject_text() {
        let state = BookingWizard::Room { guest: guest() };
        assert!(parse_step_input(&state, "2", date(2024, 1, 1)).is_err());
        assert_eq!(input_hint(&state), "Use the buttons, or /cancel to start over");
    }

    #[test]
    fn test_button_events() {
        let step = WizardStep::Confirmation;
        assert_eq!(button_event(CallbackAction::WizardYes(step), step), Some(WizardEvent::Confirmed));
        assert_eq!(button_event(CallbackAction::WizardNo(step), step), Some(WizardEvent::Rejected));
        assert_eq!(button_event(CallbackAction::WizardBack(step), step), Some(WizardEvent::Back));
        assert_eq!(
            button_event(CallbackAction::WizardRoom(4), WizardStep::Room),
            Some(WizardEvent::RoomSelected(4))
        );
        assert_eq!(button_event(CallbackAction::WizardCancel, step), Some(WizardEvent::Cancel));
        assert_eq!(button_event(CallbackAction::Home, step), None);
    }

    #[test]
    fn test_buttons_from_an_earlier_step_are_ignored() {
        // "Yes" under the returning-guest prompt, pressed once the wizard is on the cost step.
        let state = BookingWizard::Cost {
            guest: guest(),
            room_id: 1,
            stay: Stay { start: date(2024, 3, 1), end: date(2024, 3, 4) },
        };
        let stale = CallbackAction::WizardYes(WizardStep::ReturningGuest);
        assert_eq!(button_event(stale, state.step()), None);
        assert_eq!(button_event(CallbackAction::WizardBack(WizardStep::Room), state.step()), None);
        assert_eq!(
            button_event(CallbackAction::WizardBack(WizardStep::Cost), state.step()),
            Some(WizardEvent::Back)
        );
    }
}

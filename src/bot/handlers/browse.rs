//! Menu screens, booking listings and the per-booking actions.

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::callback_data::CallbackAction;
use crate::bot::context::AppContext;
use crate::bot::handlers::HandlerResult;
use crate::bot::keyboards;
use crate::bot::render;
use crate::bot::state::{BotDialogue, ConversationState};
use crate::database::models::{Booking, BookingDetails, Room};
use crate::utils::feedback::{CommandFeedback, FeedbackType};
use crate::utils::logging::{log_command_error, log_command_success, log_validation_error};
use crate::utils::markdown::escape_markdown;
use crate::utils::validation::{parse_amount, parse_year};

pub async fn send_welcome(bot: &Bot, chat_id: ChatId, is_admin: bool) -> HandlerResult {
    let request = bot
        .send_message(chat_id, render::welcome(is_admin))
        .parse_mode(ParseMode::MarkdownV2);
    if is_admin {
        request.reply_markup(keyboards::main_menu()).await?;
    } else {
        request.await?;
    }
    Ok(())
}

pub async fn send_main_menu(bot: &Bot, chat_id: ChatId) -> HandlerResult {
    bot.send_message(chat_id, render::main_menu())
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(keyboards::main_menu())
        .await?;
    Ok(())
}

pub async fn send_room_picker(bot: &Bot, chat_id: ChatId, ctx: &AppContext) -> HandlerResult {
    let rooms = Room::find_all(&ctx.db.pool).await?;
    if rooms.is_empty() {
        CommandFeedback::new(bot.clone(), chat_id)
            .send_with_keyboard(FeedbackType::Info, "No rooms have been added yet.", keyboards::home())
            .await?;
        return Ok(());
    }

    bot.send_message(chat_id, escape_markdown("🛏 Choose a room:"))
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(keyboards::browse_rooms(&rooms))
        .await?;
    Ok(())
}

pub async fn send_room_photos(bot: &Bot, chat_id: ChatId, ctx: &AppContext) -> HandlerResult {
    let rooms = Room::find_all(&ctx.db.pool).await?;
    bot.send_message(chat_id, render::room_photos(&rooms))
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(keyboards::home())
        .await?;
    Ok(())
}

pub async fn send_report(bot: &Bot, chat_id: ChatId, ctx: &AppContext) -> HandlerResult {
    let counts = Booking::count_by_status(&ctx.db.pool).await?;
    let outstanding = Booking::outstanding_balance(&ctx.db.pool).await?;

    bot.send_message(chat_id, render::report(&counts, outstanding))
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(keyboards::home())
        .await?;
    Ok(())
}

pub async fn send_scope_picker(bot: &Bot, chat_id: ChatId, room_id: i64) -> HandlerResult {
    bot.send_message(
        chat_id,
        escape_markdown(&format!("Room #{room_id}: which bookings do you need?")),
    )
    .parse_mode(ParseMode::MarkdownV2)
    .reply_markup(keyboards::browse_scope(room_id))
    .await?;
    Ok(())
}

async fn offer_listing(
    bot: &Bot,
    chat_id: ChatId,
    count: usize,
    room_id: i64,
    year: Option<i32>,
    show: CallbackAction,
) -> HandlerResult {
    if count == 0 {
        CommandFeedback::new(bot.clone(), chat_id)
            .send_with_keyboard(FeedbackType::Info, "No bookings found.", keyboards::home())
            .await?;
        return Ok(());
    }

    bot.send_message(chat_id, render::listing_found(count, room_id, year))
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(keyboards::show_listing(show))
        .await?;
    Ok(())
}

pub async fn offer_upcoming(bot: &Bot, chat_id: ChatId, ctx: &AppContext, room_id: i64) -> HandlerResult {
    let bookings = BookingDetails::find_upcoming_for_room(&ctx.db.pool, room_id, ctx.today()).await?;
    offer_listing(
        bot,
        chat_id,
        bookings.len(),
        room_id,
        None,
        CallbackAction::ShowUpcoming(room_id),
    )
    .await
}

pub async fn ask_year(bot: &Bot, chat_id: ChatId, dialogue: &BotDialogue, room_id: i64) -> HandlerResult {
    dialogue.update(ConversationState::AwaitingYear { room_id }).await?;
    bot.send_message(chat_id, escape_markdown("🗓 Enter the year, e.g. 2025."))
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(keyboards::home())
        .await?;
    Ok(())
}

/// Year typed after choosing "for a year".
pub async fn handle_year_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &BotDialogue,
    ctx: &AppContext,
    room_id: i64,
    text: &str,
) -> HandlerResult {
    let year = match parse_year(text) {
        Ok(year) => year,
        Err(e) => {
            let user_id = msg.from().map(|user| user.id.0 as i64).unwrap_or(0);
            log_validation_error("year", text, &e.to_string(), user_id);
            CommandFeedback::new(bot.clone(), msg.chat.id)
                .validation_error(&e.to_string(), "Send four digits, e.g. 2025")
                .await?;
            return Ok(());
        }
    };

    dialogue.exit().await?;
    let bookings = BookingDetails::find_for_room_in_year(&ctx.db.pool, room_id, year).await?;
    offer_listing(
        bot,
        msg.chat.id,
        bookings.len(),
        room_id,
        Some(year),
        CallbackAction::ShowYear { room_id, year },
    )
    .await
}

/// One card per booking; the last one also carries the home button.
async fn send_cards(bot: &Bot, chat_id: ChatId, bookings: &[BookingDetails]) -> HandlerResult {
    if bookings.is_empty() {
        CommandFeedback::new(bot.clone(), chat_id)
            .send_with_keyboard(FeedbackType::Info, "No bookings found.", keyboards::home())
            .await?;
        return Ok(());
    }

    let last = bookings.len() - 1;
    for (i, booking) in bookings.iter().enumerate() {
        bot.send_message(chat_id, render::booking_card(booking))
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(keyboards::booking_actions(booking, i == last))
            .await?;
    }
    Ok(())
}

pub async fn show_upcoming(bot: &Bot, chat_id: ChatId, ctx: &AppContext, room_id: i64) -> HandlerResult {
    let bookings = BookingDetails::find_upcoming_for_room(&ctx.db.pool, room_id, ctx.today()).await?;
    send_cards(bot, chat_id, &bookings).await
}

pub async fn show_year(
    bot: &Bot,
    chat_id: ChatId,
    ctx: &AppContext,
    room_id: i64,
    year: i32,
) -> HandlerResult {
    let bookings = BookingDetails::find_for_room_in_year(&ctx.db.pool, room_id, year).await?;
    send_cards(bot, chat_id, &bookings).await
}

/// Cancels the booking and refreshes its card in place.
pub async fn cancel_booking(
    bot: &Bot,
    card: &Message,
    user_id: i64,
    ctx: &AppContext,
    booking_id: i64,
) -> HandlerResult {
    let chat_id = card.chat.id;
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    if let Err(e) = ctx.bookings.cancel_booking(booking_id).await {
        log_command_error("cancel_booking", user_id, chat_id.0, &e.to_string());
        feedback.booking_error(&e).await?;
        return Ok(());
    }
    log_command_success("cancel_booking", user_id, chat_id.0, Some(&booking_id.to_string()));

    if let Some(details) = BookingDetails::find_by_id(&ctx.db.pool, booking_id).await? {
        bot.edit_message_text(chat_id, card.id, render::booking_card(&details))
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(keyboards::booking_actions(&details, false))
            .await?;
    }
    feedback
        .send_with_keyboard(
            FeedbackType::Success,
            &format!("Booking №{booking_id} canceled."),
            keyboards::home(),
        )
        .await?;
    Ok(())
}

/// Deletes the booking and its payments, replacing the card with a note.
pub async fn delete_booking(
    bot: &Bot,
    card: &Message,
    user_id: i64,
    ctx: &AppContext,
    booking_id: i64,
) -> HandlerResult {
    let chat_id = card.chat.id;

    if let Err(e) = ctx.bookings.delete_booking(booking_id).await {
        log_command_error("delete_booking", user_id, chat_id.0, &e.to_string());
        CommandFeedback::new(bot.clone(), chat_id).booking_error(&e).await?;
        return Ok(());
    }
    log_command_success("delete_booking", user_id, chat_id.0, Some(&booking_id.to_string()));

    bot.edit_message_text(
        chat_id,
        card.id,
        escape_markdown(&format!("🗑 Booking №{booking_id} deleted.")),
    )
    .parse_mode(ParseMode::MarkdownV2)
    .await?;
    Ok(())
}

pub async fn ask_payment(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &BotDialogue,
    ctx: &AppContext,
    booking_id: i64,
) -> HandlerResult {
    let Some(details) = BookingDetails::find_by_id(&ctx.db.pool, booking_id).await? else {
        CommandFeedback::new(bot.clone(), chat_id)
            .warning(&format!("Booking №{booking_id} no longer exists."))
            .await?;
        return Ok(());
    };

    dialogue
        .update(ConversationState::AwaitingPayment { booking_id })
        .await?;
    bot.send_message(
        chat_id,
        escape_markdown(&format!(
            "💸 Booking №{}: cost {} RUB, paid {} RUB, due {} RUB.\nEnter the payment amount.",
            booking_id,
            details.cost,
            details.total_paid,
            details.balance_due()
        )),
    )
    .parse_mode(ParseMode::MarkdownV2)
    .reply_markup(keyboards::home())
    .await?;
    Ok(())
}

/// Amount typed after pressing "add payment".
pub async fn record_payment(
    bot: &Bot,
    msg: &Message,
    dialogue: &BotDialogue,
    ctx: &AppContext,
    booking_id: i64,
    text: &str,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let user_id = msg.from().map(|user| user.id.0 as i64).unwrap_or(0);
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    let amount = match parse_amount(text) {
        Ok(amount) => amount,
        Err(e) => {
            log_validation_error("payment", text, &e.to_string(), user_id);
            feedback
                .validation_error(&e.to_string(), "Send a whole number of rubles, e.g. 5000")
                .await?;
            return Ok(());
        }
    };

    dialogue.exit().await?;
    match ctx.bookings.add_payment(booking_id, amount).await {
        Ok(_) => {
            log_command_success("add_payment", user_id, chat_id.0, Some(&format!("{amount} to {booking_id}")));
            let paid = BookingDetails::find_by_id(&ctx.db.pool, booking_id)
                .await?
                .map(|details| format!(" Paid {} of {} RUB.", details.total_paid, details.cost))
                .unwrap_or_default();
            feedback
                .success(&format!("Payment of {amount} RUB added to booking №{booking_id}.{paid}"))
                .await?;
        }
        Err(e) => {
            log_command_error("add_payment", user_id, chat_id.0, &e.to_string());
            feedback.booking_error(&e).await?;
        }
    }

    send_main_menu(bot, chat_id).await
}

use teloxide::prelude::*;

use crate::bot::callback_data::CallbackAction;
use crate::bot::context::AppContext;
use crate::bot::handlers::{booking, browse, HandlerResult};
use crate::bot::state::BotDialogue;

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: BotDialogue,
    ctx: AppContext,
) -> HandlerResult {
    let user_id = q.from.id.0 as i64;
    let username = q.from.username.as_deref().unwrap_or("unknown");

    if !ctx.is_admin(q.from.id) {
        tracing::warn!("Callback from non-admin user {} ({})", user_id, username);
        bot.answer_callback_query(q.id)
            .text("This bot is for guesthouse staff only")
            .await?;
        return Ok(());
    }

    let Some(message) = q.message.clone() else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };
    let chat_id = message.chat.id;

    let action = match q.data.as_deref().map(str::parse::<CallbackAction>) {
        Some(Ok(action)) => action,
        Some(Err(e)) => {
            tracing::warn!("Bad callback data from user {}: {}", user_id, e);
            bot.answer_callback_query(q.id)
                .text("This button is no longer supported")
                .await?;
            return Ok(());
        }
        None => {
            bot.answer_callback_query(q.id).await?;
            return Ok(());
        }
    };

    tracing::info!(
        "Callback {} from user {} ({}) in chat {}",
        action,
        username,
        user_id,
        chat_id
    );
    bot.answer_callback_query(q.id).await?;

    match action {
        CallbackAction::BookRoom => {
            booking::start(&bot, chat_id, user_id, &dialogue, &ctx).await?;
        }
        CallbackAction::Bookings => {
            dialogue.exit().await?;
            browse::send_room_picker(&bot, chat_id, &ctx).await?;
        }
        CallbackAction::RoomPhotos => browse::send_room_photos(&bot, chat_id, &ctx).await?,
        CallbackAction::Reports => browse::send_report(&bot, chat_id, &ctx).await?,
        CallbackAction::Home | CallbackAction::Dismiss => {
            dialogue.exit().await?;
            browse::send_main_menu(&bot, chat_id).await?;
        }
        CallbackAction::WizardYes(_)
        | CallbackAction::WizardNo(_)
        | CallbackAction::WizardBack(_)
        | CallbackAction::WizardCancel
        | CallbackAction::WizardRoom(_) => {
            booking::handle_button(&bot, chat_id, user_id, &dialogue, &ctx, action).await?;
        }
        CallbackAction::BrowseRoom(room_id) => {
            browse::send_scope_picker(&bot, chat_id, room_id).await?;
        }
        CallbackAction::BrowseUpcoming(room_id) => {
            browse::offer_upcoming(&bot, chat_id, &ctx, room_id).await?;
        }
        CallbackAction::BrowseYear(room_id) => {
            browse::ask_year(&bot, chat_id, &dialogue, room_id).await?;
        }
        CallbackAction::ShowUpcoming(room_id) => {
            browse::show_upcoming(&bot, chat_id, &ctx, room_id).await?;
        }
        CallbackAction::ShowYear { room_id, year } => {
            browse::show_year(&bot, chat_id, &ctx, room_id, year).await?;
        }
        CallbackAction::CancelBooking(booking_id) => {
            browse::cancel_booking(&bot, &message, user_id, &ctx, booking_id).await?;
        }
        CallbackAction::DeleteBooking(booking_id) => {
            browse::delete_booking(&bot, &message, user_id, &ctx, booking_id).await?;
        }
        CallbackAction::PayBooking(booking_id) => {
            browse::ask_payment(&bot, chat_id, &dialogue, &ctx, booking_id).await?;
        }
    }

    Ok(())
}

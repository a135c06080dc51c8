use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::Command;
use crate::bot::context::AppContext;
use crate::bot::handlers::{booking, browse, HandlerResult};
use crate::bot::state::{BotDialogue, ConversationState};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::log_command_start;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: BotDialogue,
    ctx: AppContext,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let is_admin = ctx.is_admin(user.id);

    if !is_admin {
        tracing::warn!("Command {:?} from non-admin user {} in chat {}", cmd, user_id, chat_id);
        return browse::send_welcome(&bot, chat_id, false).await;
    }

    log_command_start(&format!("{cmd:?}").to_lowercase(), user_id, chat_id.0, None);

    match cmd {
        Command::Help => {
            bot.send_message(chat_id, Command::descriptions().to_string()).await?;
        }
        Command::Start => {
            dialogue.exit().await?;
            browse::send_welcome(&bot, chat_id, true).await?;
        }
        Command::Book => {
            booking::start(&bot, chat_id, user_id, &dialogue, &ctx).await?;
        }
        Command::Bookings => {
            dialogue.exit().await?;
            browse::send_room_picker(&bot, chat_id, &ctx).await?;
        }
        Command::Rooms => {
            browse::send_room_photos(&bot, chat_id, &ctx).await?;
        }
        Command::Stats => {
            browse::send_report(&bot, chat_id, &ctx).await?;
        }
        Command::Cancel => {
            let active = dialogue.get().await?.unwrap_or_default() != ConversationState::Idle;
            dialogue.exit().await?;
            let feedback = CommandFeedback::new(bot.clone(), chat_id);
            if active {
                feedback.info("Dialog canceled.").await?;
            } else {
                feedback.info("Nothing to cancel.").await?;
            }
            browse::send_main_menu(&bot, chat_id).await?;
        }
    }
    Ok(())
}

/// Plain text, routed by the conversation state of the chat.
pub async fn text_handler(
    bot: Bot,
    msg: Message,
    dialogue: BotDialogue,
    ctx: AppContext,
) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    if !ctx.is_admin(user.id) {
        return browse::send_welcome(&bot, msg.chat.id, false).await;
    }

    let Some(text) = msg.text() else {
        CommandFeedback::new(bot.clone(), msg.chat.id)
            .info("Only text messages are supported.")
            .await?;
        return Ok(());
    };

    match dialogue.get().await?.unwrap_or_default() {
        ConversationState::Booking(wizard) => {
            booking::handle_text(&bot, &msg, &dialogue, &ctx, wizard, text).await?;
        }
        ConversationState::AwaitingYear { room_id } => {
            browse::handle_year_input(&bot, &msg, &dialogue, &ctx, room_id, text).await?;
        }
        ConversationState::AwaitingPayment { booking_id } => {
            browse::record_payment(&bot, &msg, &dialogue, &ctx, booking_id, text).await?;
        }
        ConversationState::Idle => {
            browse::send_main_menu(&bot, msg.chat.id).await?;
        }
    }
    Ok(())
}

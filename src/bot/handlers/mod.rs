pub mod booking;
pub mod browse;
pub mod callback;
pub mod message;

use teloxide::{
    dispatching::{dialogue, UpdateHandler},
    prelude::*,
};

use crate::bot::commands::Command;
use crate::bot::context::AppContext;
use crate::bot::state::{BotDialogue, ConversationState, DialogueStorage};

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

pub struct BotHandler {
    pub ctx: AppContext,
}

impl BotHandler {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        use teloxide::dispatching::UpdateFilterExt;

        let ctx_command = self.ctx.clone();
        let ctx_message = self.ctx.clone();
        let ctx_callback = self.ctx.clone();

        dialogue::enter::<Update, DialogueStorage, ConversationState, _>()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command, dialogue: BotDialogue| {
                        let ctx = ctx_command.clone();
                        async move { message::command_handler(bot, msg, cmd, dialogue, ctx).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(
                move |bot: Bot, msg: Message, dialogue: BotDialogue| {
                    let ctx = ctx_message.clone();
                    async move { message::text_handler(bot, msg, dialogue, ctx).await }
                },
            ))
            .branch(Update::filter_callback_query().endpoint(
                move |bot: Bot, q: CallbackQuery, dialogue: BotDialogue| {
                    let ctx = ctx_callback.clone();
                    async move { callback::callback_handler(bot, q, dialogue, ctx).await }
                },
            ))
    }
}

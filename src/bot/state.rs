use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::bot::wizard::BookingWizard;

/// Per-chat conversation state kept between updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    Booking(BookingWizard),
    AwaitingYear {
        room_id: i64,
    },
    AwaitingPayment {
        booking_id: i64,
    },
}

pub type DialogueStorage = InMemStorage<ConversationState>;
pub type BotDialogue = Dialogue<ConversationState, DialogueStorage>;

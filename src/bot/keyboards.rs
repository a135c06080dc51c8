use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::callback_data::CallbackAction;
use crate::bot::wizard::WizardStep;
use crate::database::models::{BookingDetails, Room};

fn button(text: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.encode())
}

fn wizard_nav_row(step: WizardStep) -> Vec<InlineKeyboardButton> {
    vec![
        button("⬅️ Back", CallbackAction::WizardBack(step)),
        button("✖️ Cancel", CallbackAction::WizardCancel),
    ]
}

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("🏠 New booking", CallbackAction::BookRoom)],
        vec![button("📅 Bookings", CallbackAction::Bookings)],
        vec![button("🖼 Room photos", CallbackAction::RoomPhotos)],
        vec![button("📊 Reports", CallbackAction::Reports)],
    ])
}

pub fn home() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("🏠 Main menu", CallbackAction::Home)]])
}

/// Back/cancel row for steps answered by typing.
pub fn wizard_nav(step: WizardStep) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![wizard_nav_row(step)])
}

pub fn wizard_confirm(step: WizardStep) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button("✅ Yes", CallbackAction::WizardYes(step)),
            button("❌ No", CallbackAction::WizardNo(step)),
        ],
        wizard_nav_row(step),
    ])
}

pub fn wizard_rooms(rooms: &[Room]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = rooms
        .iter()
        .map(|room| {
            vec![button(
                &format!("Room #{} – {}", room.id, room.description),
                CallbackAction::WizardRoom(room.id),
            )]
        })
        .collect();
    rows.push(wizard_nav_row(WizardStep::Room));
    InlineKeyboardMarkup::new(rows)
}

pub fn browse_rooms(rooms: &[Room]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = rooms
        .iter()
        .map(|room| {
            vec![button(
                &format!("Room #{} – {}", room.id, room.description),
                CallbackAction::BrowseRoom(room.id),
            )]
        })
        .collect();
    rows.push(vec![button("🏠 Main menu", CallbackAction::Home)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn browse_scope(room_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("📅 Upcoming only", CallbackAction::BrowseUpcoming(room_id))],
        vec![button("🗓 For a year", CallbackAction::BrowseYear(room_id))],
        vec![
            button("⬅️ Back", CallbackAction::Bookings),
            button("🏠 Main menu", CallbackAction::Home),
        ],
    ])
}

/// "Show them?" prompt after counting bookings.
pub fn show_listing(show: CallbackAction) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("✅ Show", show),
        button("❌ No", CallbackAction::Dismiss),
    ]])
}

/// Actions under a booking card. Cancel is only offered for live bookings.
pub fn booking_actions(booking: &BookingDetails, with_home: bool) -> InlineKeyboardMarkup {
    let mut first_row = Vec::new();
    if booking.status.is_live() {
        first_row.push(button("🚫 Cancel", CallbackAction::CancelBooking(booking.id)));
    }
    first_row.push(button("🗑 Delete", CallbackAction::DeleteBooking(booking.id)));

    let mut rows = vec![
        first_row,
        vec![button("💸 Add payment", CallbackAction::PayBooking(booking.id))],
    ];
    if with_home {
        rows.push(vec![button("🏠 Main menu", CallbackAction::Home)]);
    }
    InlineKeyboardMarkup::new(rows)
}

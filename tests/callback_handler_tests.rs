use chrono::NaiveDate;
use guesthouse_bot::bot::callback_data::CallbackAction;
use guesthouse_bot::bot::keyboards;
use guesthouse_bot::bot::wizard::WizardStep;
use guesthouse_bot::database::models::{BookingDetails, BookingStatus, Room};
use teloxide::types::{InlineKeyboardButtonKind, InlineKeyboardMarkup};

/// Callback data of every button, parsed back into actions.
fn actions(markup: &InlineKeyboardMarkup) -> Vec<CallbackAction> {
    markup
        .inline_keyboard
        .iter()
        .flatten()
        .map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => {
                assert!(data.len() <= 64, "callback data too long: {data}");
                data.parse().unwrap()
            }
            other => panic!("unexpected button kind {other:?}"),
        })
        .collect()
}

fn booking(status: BookingStatus) -> BookingDetails {
    BookingDetails {
        id: 41,
        room_id: 3,
        guest_phone: "79123456789".to_string(),
        date_start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        date_end: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        status,
        cost: 9000,
        created_at: "2024-02-01T10:00:00+00:00".to_string(),
        guest_name: "Anna".to_string(),
        guest_description: String::new(),
        total_paid: 0,
    }
}

fn rooms() -> Vec<Room> {
    vec![
        Room { id: 1, description: "Single".to_string(), photo_url: "https://example.com/1".to_string() },
        Room { id: 2, description: "Double".to_string(), photo_url: "https://example.com/2".to_string() },
    ]
}

#[test]
fn test_main_menu_buttons() {
    assert_eq!(
        actions(&keyboards::main_menu()),
        vec![
            CallbackAction::BookRoom,
            CallbackAction::Bookings,
            CallbackAction::RoomPhotos,
            CallbackAction::Reports,
        ]
    );
}

#[test]
fn test_wizard_room_picker() {
    assert_eq!(
        actions(&keyboards::wizard_rooms(&rooms())),
        vec![
            CallbackAction::WizardRoom(1),
            CallbackAction::WizardRoom(2),
            CallbackAction::WizardBack(WizardStep::Room),
            CallbackAction::WizardCancel,
        ]
    );
}

#[test]
fn test_wizard_confirm_buttons_name_their_step() {
    let step = WizardStep::ReturningGuest;
    assert_eq!(
        actions(&keyboards::wizard_confirm(step)),
        vec![
            CallbackAction::WizardYes(step),
            CallbackAction::WizardNo(step),
            CallbackAction::WizardBack(step),
            CallbackAction::WizardCancel,
        ]
    );
    assert_eq!(
        actions(&keyboards::wizard_nav(WizardStep::Cost)),
        vec![CallbackAction::WizardBack(WizardStep::Cost), CallbackAction::WizardCancel]
    );
}

#[test]
fn test_browse_keyboards() {
    assert_eq!(
        actions(&keyboards::browse_rooms(&rooms())),
        vec![CallbackAction::BrowseRoom(1), CallbackAction::BrowseRoom(2), CallbackAction::Home]
    );
    assert_eq!(
        actions(&keyboards::browse_scope(2)),
        vec![
            CallbackAction::BrowseUpcoming(2),
            CallbackAction::BrowseYear(2),
            CallbackAction::Bookings,
            CallbackAction::Home,
        ]
    );
    assert_eq!(
        actions(&keyboards::show_listing(CallbackAction::ShowYear { room_id: 2, year: 2024 })),
        vec![CallbackAction::ShowYear { room_id: 2, year: 2024 }, CallbackAction::Dismiss]
    );
}

#[test]
fn test_live_booking_card_offers_cancel() {
    assert_eq!(
        actions(&keyboards::booking_actions(&booking(BookingStatus::Booked), true)),
        vec![
            CallbackAction::CancelBooking(41),
            CallbackAction::DeleteBooking(41),
            CallbackAction::PayBooking(41),
            CallbackAction::Home,
        ]
    );
}

#[test]
fn test_finished_booking_card_hides_cancel() {
    for status in [BookingStatus::Completed, BookingStatus::Canceled] {
        let found = actions(&keyboards::booking_actions(&booking(status), false));
        assert_eq!(found, vec![CallbackAction::DeleteBooking(41), CallbackAction::PayBooking(41)]);
    }
}

#[test]
fn test_tampered_callback_data_rejected() {
    for data in ["booking:cancel:0", "booking:cancel:-4", "booking:pay:abc", "wiz:room", "menu:admin", ""] {
        assert!(data.parse::<CallbackAction>().is_err(), "{data}");
    }
}

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::bot::wizard::WizardStep;

/// Everything an inline button can ask the bot to do.
///
/// Encoded as `:`-separated text in the button's callback data. Wizard
/// answers carry the step that asked, so a stale button cannot answer a later step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    BookRoom,
    Bookings,
    RoomPhotos,
    Reports,
    Home,
    WizardYes(WizardStep),
    WizardNo(WizardStep),
    WizardBack(WizardStep),
    WizardCancel,
    WizardRoom(i64),
    BrowseRoom(i64),
    BrowseUpcoming(i64),
    BrowseYear(i64),
    ShowUpcoming(i64),
    ShowYear { room_id: i64, year: i32 },
    Dismiss,
    CancelBooking(i64),
    DeleteBooking(i64),
    PayBooking(i64),
}

impl CallbackAction {
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::BookRoom => write!(f, "menu:book"),
            CallbackAction::Bookings => write!(f, "menu:bookings"),
            CallbackAction::RoomPhotos => write!(f, "menu:photos"),
            CallbackAction::Reports => write!(f, "menu:reports"),
            CallbackAction::Home => write!(f, "menu:home"),
            CallbackAction::WizardYes(step) => write!(f, "wiz:yes:{}", step.as_str()),
            CallbackAction::WizardNo(step) => write!(f, "wiz:no:{}", step.as_str()),
            CallbackAction::WizardBack(step) => write!(f, "wiz:back:{}", step.as_str()),
            CallbackAction::WizardCancel => write!(f, "wiz:cancel"),
            CallbackAction::WizardRoom(id) => write!(f, "wiz:room:{id}"),
            CallbackAction::BrowseRoom(id) => write!(f, "browse:room:{id}"),
            CallbackAction::BrowseUpcoming(id) => write!(f, "browse:upcoming:{id}"),
            CallbackAction::BrowseYear(id) => write!(f, "browse:year:{id}"),
            CallbackAction::ShowUpcoming(id) => write!(f, "show:upcoming:{id}"),
            CallbackAction::ShowYear { room_id, year } => write!(f, "show:year:{room_id}:{year}"),
            CallbackAction::Dismiss => write!(f, "show:no"),
            CallbackAction::CancelBooking(id) => write!(f, "booking:cancel:{id}"),
            CallbackAction::DeleteBooking(id) => write!(f, "booking:delete:{id}"),
            CallbackAction::PayBooking(id) => write!(f, "booking:pay:{id}"),
        }
    }
}

fn parse_step(raw: &str) -> Result<WizardStep> {
    WizardStep::from_name(raw).ok_or_else(|| anyhow!("Invalid wizard step in callback data: '{}'", raw))
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| anyhow!("Invalid id in callback data: '{}'", raw))
}

impl FromStr for CallbackAction {
    type Err = anyhow::Error;

    fn from_str(data: &str) -> Result<Self> {
        let parts: Vec<&str> = data.split(':').collect();

        let action = match parts.as_slice() {
            ["menu", "book"] => CallbackAction::BookRoom,
            ["menu", "bookings"] => CallbackAction::Bookings,
            ["menu", "photos"] => CallbackAction::RoomPhotos,
            ["menu", "reports"] => CallbackAction::Reports,
            ["menu", "home"] => CallbackAction::Home,
            ["wiz", "yes", step] => CallbackAction::WizardYes(parse_step(step)?),
            ["wiz", "no", step] => CallbackAction::WizardNo(parse_step(step)?),
            ["wiz", "back", step] => CallbackAction::WizardBack(parse_step(step)?),
            ["wiz", "cancel"] => CallbackAction::WizardCancel,
            ["wiz", "room", id] => CallbackAction::WizardRoom(parse_id(id)?),
            ["browse", "room", id] => CallbackAction::BrowseRoom(parse_id(id)?),
            ["browse", "upcoming", id] => CallbackAction::BrowseUpcoming(parse_id(id)?),
            ["browse", "year", id] => CallbackAction::BrowseYear(parse_id(id)?),
            ["show", "upcoming", id] => CallbackAction::ShowUpcoming(parse_id(id)?),
            ["show", "year", id, year] => CallbackAction::ShowYear {
                room_id: parse_id(id)?,
                year: year
                    .parse()
                    .map_err(|_| anyhow!("Invalid year in callback data: '{}'", year))?,
            },
            ["show", "no"] => CallbackAction::Dismiss,
            ["booking", "cancel", id] => CallbackAction::CancelBooking(parse_id(id)?),
            ["booking", "delete", id] => CallbackAction::DeleteBooking(parse_id(id)?),
            ["booking", "pay", id] => CallbackAction::PayBooking(parse_id(id)?),
            _ => return Err(anyhow!("Unknown callback data: '{}'", data)),
        };

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: &[CallbackAction] = &[
        CallbackAction::BookRoom,
        CallbackAction::Bookings,
        CallbackAction::RoomPhotos,
        CallbackAction::Reports,
        CallbackAction::Home,
        CallbackAction::WizardYes(WizardStep::ReturningGuest),
        CallbackAction::WizardNo(WizardStep::Confirmation),
        CallbackAction::WizardBack(WizardStep::StartDate),
        CallbackAction::WizardCancel,
        CallbackAction::WizardRoom(4),
        CallbackAction::BrowseRoom(4),
        CallbackAction::BrowseUpcoming(4),
        CallbackAction::BrowseYear(4),
        CallbackAction::ShowUpcoming(4),
        CallbackAction::ShowYear { room_id: 4, year: 2025 },
        CallbackAction::Dismiss,
        CallbackAction::CancelBooking(120),
        CallbackAction::DeleteBooking(120),
        CallbackAction::PayBooking(120),
    ];

    #[test]
    fn test_every_wizard_step_round_trips() {
        for step in WizardStep::ALL {
            let action = CallbackAction::WizardBack(step);
            assert_eq!(action.encode().parse::<CallbackAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_every_action_parses_back() {
        for action in ALL_ACTIONS {
            let encoded = action.encode();
            assert!(encoded.len() <= 64, "callback data too long: {encoded}");
            assert_eq!(encoded.parse::<CallbackAction>().unwrap(), *action);
        }
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(CallbackAction::PayBooking(7).encode(), "booking:pay:7");
        assert_eq!(CallbackAction::WizardYes(WizardStep::NewGuest).encode(), "wiz:yes:new_guest");
        assert_eq!(CallbackAction::ShowYear { room_id: 2, year: 2024 }.encode(), "show:year:2:2024");
    }

    #[test]
    fn test_garbage_is_rejected() {
        for data in ["", "menu", "wiz:yes", "wiz:no:somewhere", "menu:unknown", "wiz:room", "wiz:room:abc", "booking:pay:-1", "booking:pay:0", "show:year:1:twenty", "booking:pay:1:extra"] {
            assert!(data.parse::<CallbackAction>().is_err(), "{data} should be rejected");
        }
    }
}

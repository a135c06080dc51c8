//! Booking wizard state machine.
//!
//! Each [`BookingWizard`] variant carries exactly the data collected up to
//! that step. [`transition`] is pure: lookups, availability checks and writes
//! are done by the caller, which feeds their results in as events and carries
//! out the [`Transition`] it gets back.
//!
//! ```text
//! Phone ─┬─ known guest ──► ReturningGuest ─┐
//!        └─ new guest ───► Name ► Description ► NewGuest ─┤
//!                                                          ▼
//!            Confirmation ◄ Cost ◄ EndDate ◄ StartDate ◄ Room
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::models::{Guest, NewBooking};
use crate::services::availability::Stay;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestProfile {
    pub phone: String,
    pub name: String,
    pub description: String,
}

impl From<Guest> for GuestProfile {
    fn from(guest: Guest) -> Self {
        Self {
            phone: guest.phone,
            name: guest.name,
            description: guest.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookingWizard {
    #[default]
    Phone,
    ReturningGuest {
        guest: GuestProfile,
    },
    Name {
        phone: String,
    },
    Description {
        phone: String,
        name: String,
    },
    NewGuest {
        guest: GuestProfile,
    },
    Room {
        guest: GuestProfile,
    },
    StartDate {
        guest: GuestProfile,
        room_id: i64,
    },
    EndDate {
        guest: GuestProfile,
        room_id: i64,
        start: NaiveDate,
    },
    Cost {
        guest: GuestProfile,
        room_id: i64,
        stay: Stay,
    },
    Confirmation {
        guest: GuestProfile,
        room_id: i64,
        stay: Stay,
        cost: i64,
    },
}

/// Names a wizard step, e.g. in button data tied to the step that sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Phone,
    ReturningGuest,
    Name,
    Description,
    NewGuest,
    Room,
    StartDate,
    EndDate,
    Cost,
    Confirmation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 10] = [
        WizardStep::Phone,
        WizardStep::ReturningGuest,
        WizardStep::Name,
        WizardStep::Description,
        WizardStep::NewGuest,
        WizardStep::Room,
        WizardStep::StartDate,
        WizardStep::EndDate,
        WizardStep::Cost,
        WizardStep::Confirmation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Phone => "phone",
            WizardStep::ReturningGuest => "returning_guest",
            WizardStep::Name => "name",
            WizardStep::Description => "description",
            WizardStep::NewGuest => "new_guest",
            WizardStep::Room => "room",
            WizardStep::StartDate => "start_date",
            WizardStep::EndDate => "end_date",
            WizardStep::Cost => "cost",
            WizardStep::Confirmation => "confirmation",
        }
    }

    pub fn from_name(name: &str) -> Option<WizardStep> {
        WizardStep::ALL.into_iter().find(|step| step.as_str() == name)
    }
}

impl BookingWizard {
    pub fn step(&self) -> WizardStep {
        match self {
            BookingWizard::Phone => WizardStep::Phone,
            BookingWizard::ReturningGuest { .. } => WizardStep::ReturningGuest,
            BookingWizard::Name { .. } => WizardStep::Name,
            BookingWizard::Description { .. } => WizardStep::Description,
            BookingWizard::NewGuest { .. } => WizardStep::NewGuest,
            BookingWizard::Room { .. } => WizardStep::Room,
            BookingWizard::StartDate { .. } => WizardStep::StartDate,
            BookingWizard::EndDate { .. } => WizardStep::EndDate,
            BookingWizard::Cost { .. } => WizardStep::Cost,
            BookingWizard::Confirmation { .. } => WizardStep::Confirmation,
        }
    }

    pub fn step_name(&self) -> &'static str {
        self.step().as_str()
    }

    /// Steps answered with buttons rather than typed text.
    pub fn expects_buttons(&self) -> bool {
        matches!(
            self,
            BookingWizard::ReturningGuest { .. }
                | BookingWizard::NewGuest { .. }
                | BookingWizard::Room { .. }
                | BookingWizard::Confirmation { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// Phone number after normalization, with the guest found for it.
    PhoneEntered {
        phone: String,
        known_guest: Option<GuestProfile>,
    },
    NameEntered(String),
    DescriptionEntered(String),
    Confirmed,
    Rejected,
    RoomSelected(i64),
    StartDateEntered(NaiveDate),
    /// Check-out date with the availability verdict for the whole stay.
    EndDateEntered {
        date: NaiveDate,
        available: bool,
    },
    CostEntered(i64),
    Back,
    Cancel,
}

impl WizardEvent {
    fn name(&self) -> &'static str {
        match self {
            WizardEvent::PhoneEntered { .. } => "phone",
            WizardEvent::NameEntered(_) => "name",
            WizardEvent::DescriptionEntered(_) => "description",
            WizardEvent::Confirmed => "confirmation",
            WizardEvent::Rejected => "rejection",
            WizardEvent::RoomSelected(_) => "room",
            WizardEvent::StartDateEntered(_) => "check-in date",
            WizardEvent::EndDateEntered { .. } => "check-out date",
            WizardEvent::CostEntered(_) => "cost",
            WizardEvent::Back => "back",
            WizardEvent::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Next(BookingWizard),
    /// The guest details were confirmed and must be stored before moving on.
    SaveGuest {
        guest: GuestProfile,
        next: BookingWizard,
    },
    /// The input was understood but cannot be used; continue from `next`.
    Retry {
        next: BookingWizard,
        reason: WizardError,
    },
    /// All data confirmed; create the booking.
    Submit(NewBooking),
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("{input} is not expected at the {step} step")]
    UnexpectedInput {
        step: &'static str,
        input: &'static str,
    },
    #[error("check-out {end} must be after check-in {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("the room is already booked for some of these nights")]
    Unavailable,
    #[error("cost must be greater than zero, got {0}")]
    InvalidCost(i64),
}

/// Applies `event` to `state`. Errors leave the wizard where it was.
pub fn transition(state: BookingWizard, event: WizardEvent) -> Result<Transition, WizardError> {
    use BookingWizard as W;
    use WizardEvent as E;

    if event == E::Cancel {
        return Ok(Transition::Abort);
    }
    if event == E::Back {
        return Ok(step_back(state));
    }

    let next = match (state, event) {
        (W::Phone, E::PhoneEntered { phone, known_guest }) => match known_guest {
            Some(guest) => W::ReturningGuest { guest },
            None => W::Name { phone },
        },

        (W::ReturningGuest { guest }, E::Confirmed) => W::Room { guest },
        // Details on file are outdated: re-enter them for the same phone.
        (W::ReturningGuest { guest }, E::Rejected) => W::Name { phone: guest.phone },

        (W::Name { phone }, E::NameEntered(name)) => W::Description { phone, name },

        (W::Description { phone, name }, E::DescriptionEntered(description)) => W::NewGuest {
            guest: GuestProfile {
                phone,
                name,
                description,
            },
        },

        (W::NewGuest { guest }, E::Confirmed) => {
            return Ok(Transition::SaveGuest {
                next: W::Room {
                    guest: guest.clone(),
                },
                guest,
            });
        }
        (W::NewGuest { .. }, E::Rejected) => W::Phone,

        (W::Room { guest }, E::RoomSelected(room_id)) => W::StartDate { guest, room_id },

        (W::StartDate { guest, room_id }, E::StartDateEntered(start)) => W::EndDate {
            guest,
            room_id,
            start,
        },

        (W::EndDate { guest, room_id, start }, E::EndDateEntered { date, available }) => {
            if date <= start {
                return Err(WizardError::InvalidRange { start, end: date });
            }
            if !available {
                return Ok(Transition::Retry {
                    next: W::StartDate { guest, room_id },
                    reason: WizardError::Unavailable,
                });
            }
            W::Cost {
                guest,
                room_id,
                stay: Stay { start, end: date },
            }
        }

        (W::Cost { guest, room_id, stay }, E::CostEntered(cost)) => {
            if cost <= 0 {
                return Err(WizardError::InvalidCost(cost));
            }
            W::Confirmation {
                guest,
                room_id,
                stay,
                cost,
            }
        }

        (W::Confirmation { guest, room_id, stay, cost }, E::Confirmed) => {
            return Ok(Transition::Submit(NewBooking {
                room_id,
                guest_phone: guest.phone,
                stay,
                cost,
            }));
        }
        (W::Confirmation { .. }, E::Rejected) => return Ok(Transition::Abort),

        (state, event) => {
            return Err(WizardError::UnexpectedInput {
                step: state.step_name(),
                input: event.name(),
            });
        }
    };

    Ok(Transition::Next(next))
}

fn step_back(state: BookingWizard) -> Transition {
    use BookingWizard as W;

    let previous = match state {
        W::Phone => return Transition::Abort,
        W::ReturningGuest { .. } | W::Name { .. } | W::Room { .. } => W::Phone,
        W::Description { phone, .. } => W::Name { phone },
        W::NewGuest { guest } => W::Description {
            phone: guest.phone,
            name: guest.name,
        },
        W::StartDate { guest, .. } => W::Room { guest },
        W::EndDate { guest, room_id, .. } => W::StartDate { guest, room_id },
        W::Cost { guest, room_id, stay } => W::EndDate {
            guest,
            room_id,
            start: stay.start,
        },
        W::Confirmation { guest, room_id, stay, .. } => W::Cost { guest, room_id, stay },
    };

    Transition::Next(previous)
}

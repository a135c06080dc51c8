//! Booking availability rule.
//!
//! A stay is the half-open interval `[start, end)`: the guest arrives on
//! `start` and leaves on `end`, so a check-out and a check-in on the same day
//! never conflict. Only live (`booked`) bookings are considered.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::database::connection::DatabaseManager;
use crate::database::models::{Booking, Room};
use crate::error::BookingError;

/// Half-open stay interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stay {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Stay {
    /// Builds a stay, rejecting empty or inverted ranges.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BookingError> {
        if start >= end {
            return Err(BookingError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &Stay) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// True when `candidate` overlaps none of `existing`.
pub fn is_free<'a>(candidate: &Stay, existing: impl IntoIterator<Item = &'a Stay>) -> bool {
    existing.into_iter().all(|stay| !candidate.overlaps(stay))
}

/// Read access the checker needs: room existence and the live stays of a room.
pub trait StayStore {
    fn room_exists(&self, room_id: i64) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;

    fn live_stays(
        &self,
        room_id: i64,
    ) -> impl Future<Output = Result<Vec<Stay>, sqlx::Error>> + Send;
}

impl StayStore for DatabaseManager {
    async fn room_exists(&self, room_id: i64) -> Result<bool, sqlx::Error> {
        Room::exists(&self.pool, room_id).await
    }

    async fn live_stays(&self, room_id: i64) -> Result<Vec<Stay>, sqlx::Error> {
        Booking::live_stays_for_room(&self.pool, room_id).await
    }
}

pub struct AvailabilityChecker<S> {
    store: S,
}

impl<S: StayStore> AvailabilityChecker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Decides whether `[start, end)` can be booked for the room.
    ///
    /// The range is validated before any query runs.
    pub async fn is_available(
        &self,
        room_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, BookingError> {
        let candidate = Stay::new(start, end)?;

        if !self.store.room_exists(room_id).await? {
            return Err(BookingError::RoomNotFound(room_id));
        }

        let existing = self.store.live_stays(room_id).await?;
        let free = is_free(&candidate, &existing);

        tracing::debug!(
            "Availability of room {} for {}..{}: {} ({} live bookings)",
            room_id,
            start,
            end,
            free,
            existing.len()
        );

        Ok(free)
    }
}

use chrono::NaiveDate;

use crate::config::CompletionPolicy;
use crate::database::connection::DatabaseManager;
use crate::database::models::*;
use crate::error::BookingError;
use crate::services::availability::{AvailabilityChecker, Stay};
use crate::utils::logging::{log_database_error, log_database_operation};

/// Booking mutations. Every write that can break the no-overlap rule goes
/// through here.
#[derive(Clone)]
pub struct BookingService {
    db: DatabaseManager,
}

impl BookingService {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    pub fn checker(&self) -> AvailabilityChecker<DatabaseManager> {
        AvailabilityChecker::new(self.db.clone())
    }

    pub async fn is_available(
        &self,
        room_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, BookingError> {
        self.checker().is_available(room_id, start, end).await
    }

    /// Creates a booking after re-checking availability.
    pub async fn create_booking(&self, new_booking: &NewBooking) -> Result<Booking, BookingError> {
        let Stay { start, end } = Stay::new(new_booking.stay.start, new_booking.stay.end)?;
        let room_id = new_booking.room_id;

        if !self.is_available(room_id, start, end).await? {
            return Err(BookingError::Unavailable { room_id, start, end });
        }

        log_database_operation("INSERT", "bookings", Some(&format!("room {room_id} {start}..{end}")));
        match Booking::insert_if_available(&self.db.pool, new_booking).await {
            Ok(Some(booking)) => {
                tracing::info!(
                    "Booking {} created for room {} ({}..{}) guest {}",
                    booking.id,
                    room_id,
                    start,
                    end,
                    booking.guest_phone
                );
                Ok(booking)
            }
            // Another booking landed between the check and the insert.
            Ok(None) => Err(BookingError::Unavailable { room_id, start, end }),
            Err(e) => {
                log_database_error("INSERT", "bookings", &e.to_string(), None);
                Err(e.into())
            }
        }
    }

    pub async fn cancel_booking(&self, booking_id: i64) -> Result<Booking, BookingError> {
        let booking = self.find(booking_id).await?;

        if !Booking::set_status_if_live(&self.db.pool, booking_id, BookingStatus::Canceled).await? {
            return Err(BookingError::InvalidTransition {
                id: booking_id,
                status: booking.status.to_string(),
            });
        }

        tracing::info!("Booking {} canceled", booking_id);
        Ok(Booking {
            status: BookingStatus::Canceled,
            ..booking
        })
    }

    pub async fn delete_booking(&self, booking_id: i64) -> Result<(), BookingError> {
        if !Booking::delete(&self.db.pool, booking_id).await? {
            return Err(BookingError::BookingNotFound(booking_id));
        }

        tracing::info!("Booking {} deleted", booking_id);
        Ok(())
    }

    pub async fn add_payment(&self, booking_id: i64, amount: i64) -> Result<Payment, BookingError> {
        if amount <= 0 {
            return Err(BookingError::InvalidAmount(amount));
        }
        self.find(booking_id).await?;

        let payment = Payment::create(&self.db.pool, booking_id, amount).await?;
        tracing::info!("Payment of {} added to booking {}", amount, booking_id);
        Ok(payment)
    }

    pub async fn complete_past_bookings(
        &self,
        today: NaiveDate,
        policy: CompletionPolicy,
    ) -> Result<u64, BookingError> {
        let updated = Booking::complete_past(&self.db.pool, today, policy).await?;
        if updated > 0 {
            tracing::info!("Marked {} bookings as completed (policy: {})", updated, policy);
        } else {
            tracing::info!("No bookings to complete (policy: {})", policy);
        }
        Ok(updated)
    }

    async fn find(&self, booking_id: i64) -> Result<Booking, BookingError> {
        Booking::find_by_id(&self.db.pool, booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))
    }
}

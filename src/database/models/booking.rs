use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::config::CompletionPolicy;
use crate::services::availability::Stay;

/// Lifecycle of a booking. Only `Booked` participates in overlap checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Booked,
    Completed,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::Completed => "completed",
            BookingStatus::Canceled => "canceled",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, BookingStatus::Booked)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub room_id: i64,
    pub guest_phone: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub status: BookingStatus,
    pub cost: i64,
    pub created_at: String,
}

/// A booking joined with its guest and the sum of its payments.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BookingDetails {
    pub id: i64,
    pub room_id: i64,
    pub guest_phone: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub status: BookingStatus,
    pub cost: i64,
    pub created_at: String,
    pub guest_name: String,
    pub guest_description: String,
    pub total_paid: i64,
}

impl BookingDetails {
    pub fn balance_due(&self) -> i64 {
        self.cost - self.total_paid
    }
}

/// Data collected by the booking wizard, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub room_id: i64,
    pub guest_phone: String,
    pub stay: Stay,
    pub cost: i64,
}

/// Number of bookings in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCounts {
    pub booked: i64,
    pub completed: i64,
    pub canceled: i64,
}

impl BookingCounts {
    pub fn total(&self) -> i64 {
        self.booked + self.completed + self.canceled
    }
}

const BOOKING_COLUMNS: &str =
    "id, room_id, guest_phone, date_start, date_end, status, cost, created_at";

const DETAILS_QUERY: &str = r#"
    SELECT b.id, b.room_id, b.guest_phone, b.date_start, b.date_end, b.status, b.cost, b.created_at,
           g.name AS guest_name,
           g.description AS guest_description,
           COALESCE((SELECT SUM(p.amount) FROM payments p WHERE p.booking_id = b.id), 0) AS total_paid
    FROM bookings b
    JOIN guests g ON g.phone = b.guest_phone
"#;

impl Booking {
    pub fn stay(&self) -> Stay {
        Stay {
            start: self.date_start,
            end: self.date_end,
        }
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        booking_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"
        ))
        .bind(booking_id)
        .fetch_optional(pool)
        .await
    }

    /// Stay intervals of every live booking for the room.
    pub async fn live_stays_for_room(
        pool: &sqlx::SqlitePool,
        room_id: i64,
    ) -> Result<Vec<Stay>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
            "SELECT date_start, date_end FROM bookings WHERE room_id = ? AND status = 'booked' ORDER BY date_start",
        )
        .bind(room_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(start, end)| Stay { start, end })
            .collect())
    }

    /// Inserts the booking unless a live booking for the same room overlaps it.
    ///
    /// The overlap test and the insert run as one statement, so two concurrent
    /// attempts for the same dates cannot both succeed. Returns `None` when the
    /// room was taken.
    pub async fn insert_if_available(
        pool: &sqlx::SqlitePool,
        new_booking: &NewBooking,
    ) -> Result<Option<Self>, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let Stay { start, end } = new_booking.stay;

        let result = sqlx::query(
            r#"
            INSERT INTO bookings (room_id, guest_phone, date_start, date_end, status, cost, created_at)
            SELECT ?, ?, ?, ?, 'booked', ?, ?
            WHERE NOT EXISTS (
                SELECT 1 FROM bookings
                WHERE room_id = ?
                  AND status = 'booked'
                  AND date_start < ?
                  AND date_end > ?
            )
            "#,
        )
        .bind(new_booking.room_id)
        .bind(&new_booking.guest_phone)
        .bind(start)
        .bind(end)
        .bind(new_booking.cost)
        .bind(&now)
        .bind(new_booking.room_id)
        .bind(end)
        .bind(start)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::find_by_id(pool, result.last_insert_rowid()).await
    }

    /// Moves a live booking to `status`. Returns false if it was not live.
    pub async fn set_status_if_live(
        pool: &sqlx::SqlitePool,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ? AND status = 'booked'")
            .bind(status)
            .bind(booking_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes the booking together with its payments.
    pub async fn delete(pool: &sqlx::SqlitePool, booking_id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM payments WHERE booking_id = ?")
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Marks live bookings whose stay has passed as completed.
    pub async fn complete_past(
        pool: &sqlx::SqlitePool,
        today: NaiveDate,
        policy: CompletionPolicy,
    ) -> Result<u64, sqlx::Error> {
        let query = match policy {
            CompletionPolicy::AfterCheckout => {
                "UPDATE bookings SET status = 'completed' WHERE status = 'booked' AND date_end < ?"
            }
            CompletionPolicy::AfterCheckin => {
                "UPDATE bookings SET status = 'completed' WHERE status = 'booked' AND date_start < ?"
            }
        };

        let result = sqlx::query(query).bind(today).execute(pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn count_by_status(pool: &sqlx::SqlitePool) -> Result<BookingCounts, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM bookings GROUP BY status",
        )
        .fetch_all(pool)
        .await?;

        let mut counts = BookingCounts::default();
        for (status, count) in rows {
            match status.as_str() {
                "booked" => counts.booked = count,
                "completed" => counts.completed = count,
                "canceled" => counts.canceled = count,
                other => tracing::warn!("Unknown booking status in database: {}", other),
            }
        }
        Ok(counts)
    }

    /// Amount still owed across all live bookings.
    pub async fn outstanding_balance(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(b.cost - COALESCE((SELECT SUM(p.amount) FROM payments p WHERE p.booking_id = b.id), 0)), 0)
            FROM bookings b
            WHERE b.status = 'booked'
            "#,
        )
        .fetch_one(pool)
        .await
    }
}

impl BookingDetails {
    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        booking_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, BookingDetails>(&format!("{DETAILS_QUERY} WHERE b.id = ?"))
            .bind(booking_id)
            .fetch_optional(pool)
            .await
    }

    /// Live bookings of the room that have not checked out before `today`.
    pub async fn find_upcoming_for_room(
        pool: &sqlx::SqlitePool,
        room_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, BookingDetails>(&format!(
            "{DETAILS_QUERY} WHERE b.room_id = ? AND b.status = 'booked' AND b.date_end >= ? ORDER BY b.date_start"
        ))
        .bind(room_id)
        .bind(today)
        .fetch_all(pool)
        .await
    }

    /// Bookings of any status whose stay touches the given calendar year.
    pub async fn find_for_room_in_year(
        pool: &sqlx::SqlitePool,
        room_id: i64,
        year: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let (Some(first_day), Some(next_year)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year + 1, 1, 1),
        ) else {
            return Ok(Vec::new());
        };

        sqlx::query_as::<_, BookingDetails>(&format!(
            "{DETAILS_QUERY} WHERE b.room_id = ? AND b.date_start < ? AND b.date_end > ? ORDER BY b.date_start"
        ))
        .bind(room_id)
        .bind(next_year)
        .bind(first_day)
        .fetch_all(pool)
        .await
    }

    /// Live bookings arriving on `date`.
    pub async fn check_ins_on(
        pool: &sqlx::SqlitePool,
        date: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, BookingDetails>(&format!(
            "{DETAILS_QUERY} WHERE b.status = 'booked' AND b.date_start = ? ORDER BY b.room_id"
        ))
        .bind(date)
        .fetch_all(pool)
        .await
    }

    /// Bookings (live or already completed) leaving on `date`.
    pub async fn check_outs_on(
        pool: &sqlx::SqlitePool,
        date: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, BookingDetails>(&format!(
            "{DETAILS_QUERY} WHERE b.status IN ('booked', 'completed') AND b.date_end = ? ORDER BY b.room_id"
        ))
        .bind(date)
        .fetch_all(pool)
        .await
    }

    pub fn nights(&self) -> i64 {
        (self.date_end - self.date_start).num_days()
    }
}

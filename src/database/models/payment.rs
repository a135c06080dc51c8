use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub booking_id: i64,
    pub amount: i64,
    pub created_at: String,
}

impl Payment {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        booking_id: i64,
        amount: i64,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO payments (booking_id, amount, created_at) VALUES (?, ?, ?)",
        )
        .bind(booking_id)
        .bind(amount)
        .bind(&now)
        .execute(pool)
        .await?;

        Ok(Payment {
            id: result.last_insert_rowid(),
            booking_id,
            amount,
            created_at: now,
        })
    }

    pub async fn find_by_booking(
        pool: &sqlx::SqlitePool,
        booking_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            "SELECT id, booking_id, amount, created_at FROM payments WHERE booking_id = ? ORDER BY id",
        )
        .bind(booking_id)
        .fetch_all(pool)
        .await
    }

    /// Sum of all payments for a booking, zero when nothing was paid yet.
    pub async fn total_for_booking(
        pool: &sqlx::SqlitePool,
        booking_id: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE booking_id = ?",
        )
        .bind(booking_id)
        .fetch_one(pool)
        .await
    }
}

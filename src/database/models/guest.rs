use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A guest, identified by the normalized phone number (`7XXXXXXXXXX`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Guest {
    pub phone: String,
    pub name: String,
    pub description: String,
    pub updated_at: String,
}

impl Guest {
    pub async fn find_by_phone(
        pool: &sqlx::SqlitePool,
        phone: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Guest>(
            "SELECT phone, name, description, updated_at FROM guests WHERE phone = ?",
        )
        .bind(phone)
        .fetch_optional(pool)
        .await
    }

    /// Creates the guest or refreshes the name and description of a returning one.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        phone: &str,
        name: &str,
        description: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO guests (phone, name, description, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(phone) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(phone)
        .bind(name)
        .bind(description)
        .bind(&now)
        .execute(pool)
        .await?;

        Ok(Guest {
            phone: phone.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            updated_at: now,
        })
    }
}

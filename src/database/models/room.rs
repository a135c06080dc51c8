use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    pub id: i64,
    pub description: String,
    pub photo_url: String,
}

impl Room {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        description: &str,
        photo_url: &str,
    ) -> Result<Self, sqlx::Error> {
        let result = sqlx::query("INSERT INTO rooms (description, photo_url) VALUES (?, ?)")
            .bind(description)
            .bind(photo_url)
            .execute(pool)
            .await?;

        Self::find_by_id(pool, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        room_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Room>("SELECT id, description, photo_url FROM rooms WHERE id = ?")
            .bind(room_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Room>("SELECT id, description, photo_url FROM rooms ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn exists(pool: &sqlx::SqlitePool, room_id: i64) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms WHERE id = ?")
            .bind(room_id)
            .fetch_one(pool)
            .await?;

        Ok(count > 0)
    }
}

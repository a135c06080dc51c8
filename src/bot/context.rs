use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use teloxide::types::UserId;

use crate::database::connection::DatabaseManager;
use crate::services::booking::BookingService;
use crate::utils::datetime::local_today;

/// Shared state handed to every update handler.
#[derive(Clone)]
pub struct AppContext {
    pub db: DatabaseManager,
    pub bookings: BookingService,
    admins: Arc<HashSet<i64>>,
    utc_offset_hours: i32,
}

impl AppContext {
    pub fn new(db: DatabaseManager, admin_ids: &[i64], utc_offset_hours: i32) -> Self {
        Self {
            bookings: BookingService::new(db.clone()),
            db,
            admins: Arc::new(admin_ids.iter().copied().collect()),
            utc_offset_hours,
        }
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        i64::try_from(user_id.0)
            .map(|id| self.admins.contains(&id))
            .unwrap_or(false)
    }

    /// Current date at the guesthouse.
    pub fn today(&self) -> NaiveDate {
        local_today(self.utc_offset_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn context(admins: &[i64]) -> (AppContext, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("ctx.db").display());
        let db = DatabaseManager::new(&db_url).await.unwrap();
        (AppContext::new(db, admins, 3), temp_dir)
    }

    #[tokio::test]
    async fn test_only_configured_admins_are_admins() {
        let (ctx, _dir) = context(&[111, 222]).await;
        assert!(ctx.is_admin(UserId(111)));
        assert!(ctx.is_admin(UserId(222)));
        assert!(!ctx.is_admin(UserId(333)));
    }

    #[tokio::test]
    async fn test_no_admins_configured() {
        let (ctx, _dir) = context(&[]).await;
        assert!(!ctx.is_admin(UserId(111)));
    }
}

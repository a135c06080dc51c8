use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::bot::render;
use crate::config::{CompletionPolicy, Config};
use crate::database::connection::DatabaseManager;
use crate::database::models::BookingDetails;
use crate::services::booking::BookingService;
use crate::utils::datetime::local_today;
use crate::utils::logging::log_system_event;

type JobResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Settings for the two daily jobs.
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub completion_cron: String,
    pub digest_cron: String,
    pub completion_policy: CompletionPolicy,
    pub utc_offset_hours: i32,
    pub admin_ids: Vec<i64>,
}

impl From<&Config> for JobSettings {
    fn from(config: &Config) -> Self {
        Self {
            completion_cron: config.completion_cron.clone(),
            digest_cron: config.digest_cron.clone(),
            completion_policy: config.completion_policy,
            utc_offset_hours: config.utc_offset_hours,
            admin_ids: config.admin_ids.clone(),
        }
    }
}

/// Runs the morning completion sweep and the admin digest on cron schedules.
pub struct DailyJobsService {
    bot: Bot,
    db: Arc<DatabaseManager>,
    settings: Arc<JobSettings>,
    scheduler: JobScheduler,
}

impl DailyJobsService {
    pub async fn new(bot: Bot, db: Arc<DatabaseManager>, settings: JobSettings) -> JobResult<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            bot,
            db,
            settings: Arc::new(settings),
            scheduler,
        })
    }

    pub async fn start(&mut self) -> JobResult<()> {
        let db = self.db.clone();
        let settings = self.settings.clone();
        let completion_job = Job::new_async(self.settings.completion_cron.as_str(), move |_uuid, _l| {
            let db = db.clone();
            let settings = settings.clone();
            Box::pin(async move {
                if let Err(e) = complete_past_bookings(&db, &settings).await {
                    tracing::error!("Failed to complete past bookings: {}", e);
                }
            })
        })?;

        let bot = self.bot.clone();
        let db = self.db.clone();
        let settings = self.settings.clone();
        let digest_job = Job::new_async(self.settings.digest_cron.as_str(), move |_uuid, _l| {
            let bot = bot.clone();
            let db = db.clone();
            let settings = settings.clone();
            Box::pin(async move {
                if let Err(e) = send_daily_digest(&bot, &db, &settings).await {
                    tracing::error!("Failed to send daily digest: {}", e);
                }
            })
        })?;

        self.scheduler.add(completion_job).await?;
        self.scheduler.add(digest_job).await?;
        self.scheduler.start().await?;

        tracing::info!(
            "Daily jobs started - completion '{}' (policy {}), digest '{}' (UTC)",
            self.settings.completion_cron,
            self.settings.completion_policy,
            self.settings.digest_cron
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> JobResult<()> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    /// Runs the completion sweep immediately. Returns the number of bookings completed.
    pub async fn run_completion_now(&self) -> JobResult<u64> {
        complete_past_bookings(&self.db, &self.settings).await
    }

    /// Sends today's digest immediately. Returns how many admins received it.
    pub async fn send_digest_now(&self) -> JobResult<usize> {
        send_daily_digest(&self.bot, &self.db, &self.settings).await
    }
}

async fn complete_past_bookings(db: &DatabaseManager, settings: &JobSettings) -> JobResult<u64> {
    let today = local_today(settings.utc_offset_hours);
    let service = BookingService::new(db.clone());
    let completed = service
        .complete_past_bookings(today, settings.completion_policy)
        .await?;
    log_system_event("completion_job", Some(&format!("{completed} bookings completed for {today}")));
    Ok(completed)
}

/// Builds today's digest text, or `None` when nobody arrives or leaves.
pub async fn build_digest(db: &DatabaseManager, today: chrono::NaiveDate) -> JobResult<Option<String>> {
    let check_ins = BookingDetails::check_ins_on(&db.pool, today).await?;
    let check_outs = BookingDetails::check_outs_on(&db.pool, today).await?;
    Ok(render::daily_digest(today, &check_ins, &check_outs))
}

async fn send_daily_digest(bot: &Bot, db: &DatabaseManager, settings: &JobSettings) -> JobResult<usize> {
    let today = local_today(settings.utc_offset_hours);

    let Some(text) = build_digest(db, today).await? else {
        log_system_event("digest_job", Some(&format!("nothing to report for {today}")));
        return Ok(0);
    };

    let mut delivered = 0;
    for admin_id in &settings.admin_ids {
        // A blocked bot or a wrong id must not stop the other admins' digests.
        match bot
            .send_message(ChatId(*admin_id), text.clone())
            .parse_mode(ParseMode::MarkdownV2)
            .await
        {
            Ok(_) => delivered += 1,
            Err(e) => tracing::warn!("Failed to send digest to admin {}: {}", admin_id, e),
        }
    }

    log_system_event(
        "digest_job",
        Some(&format!("digest for {today} sent to {delivered} of {} admins", settings.admin_ids.len())),
    );
    Ok(delivered)
}

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

const DISPLAY_FORMAT: &str = "%d.%m.%Y";

/// Parses a stay date typed by an admin: `DD.MM.YYYY` (single-digit day and
/// month allowed) or ISO `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();

    NaiveDate::parse_from_str(input, DISPLAY_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y-%m-%d"))
        .map_err(|_| anyhow!("Could not read date '{}', expected DD.MM.YYYY", input))
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Calendar date at `now` in a fixed UTC offset.
pub fn date_at_offset(now: DateTime<Utc>, offset_hours: i32) -> NaiveDate {
    match FixedOffset::east_opt(offset_hours * 3600) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}

/// Today's date for the guesthouse.
pub fn local_today(offset_hours: i32) -> NaiveDate {
    date_at_offset(Utc::now(), offset_hours)
}

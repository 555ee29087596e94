//! Wire timestamp handling. Timestamps travel as `YYYY-MM-DD HH:MM` in the
//! service time zone; dates as `YYYY-MM-DD`.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::{AppError, AppResult};

pub const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_wire_datetime(value: &str, offset: FixedOffset) -> AppResult<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), WIRE_DATETIME_FORMAT).map_err(|_| {
        AppError::InvalidInput(format!(
            "Invalid time format '{}', use YYYY-MM-DD HH:MM",
            value
        ))
    })?;

    // A fixed offset maps every local time to exactly one instant
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid time '{}'", value)))
}

/// Render in the service zone whatever offset the value was read back with.
pub fn format_wire_datetime(value: &DateTime<FixedOffset>, offset: FixedOffset) -> String {
    value.with_timezone(&offset).format(WIRE_DATETIME_FORMAT).to_string()
}

pub fn parse_wire_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), WIRE_DATE_FORMAT)
        .map_err(|_| AppError::InvalidInput("Invalid date format, use YYYY-MM-DD".to_string()))
}

/// Half-open `[start, start + 24h)` window covering `date` in the given zone.
pub fn day_window(
    date: NaiveDate,
    offset: FixedOffset,
) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let start = offset.from_utc_datetime(&(date.and_time(chrono::NaiveTime::MIN) - offset));
    (start, start + Duration::hours(24))
}

/// Travel time as `"<H>h <M>m"`, truncating leftover seconds.
pub fn format_duration(departure: &DateTime<FixedOffset>, arrival: &DateTime<FixedOffset>) -> String {
    let minutes = (*arrival - *departure).num_minutes();
    format!("{}h {}m", minutes / 60, minutes % 60)
}

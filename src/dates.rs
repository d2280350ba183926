use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use hourglass_rs::SafeTimeProvider;

use crate::errors::{CalcError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `(end - start).days + 1`, a same-day refund has used one day
pub fn inclusive_day_span(start: NaiveDate, end: NaiveDate) -> i64 {
    days_between(start, end) + 1
}

/// raw calendar day difference
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// whole minutes from `from` to `to`, rejecting reversed instants
///
/// Both instants carry the civil timezone, so naive and aware times never mix.
pub fn elapsed_minutes(from: DateTime<Tz>, to: DateTime<Tz>) -> Result<i64> {
    if to < from {
        return Err(CalcError::InvalidTimeOrder {
            earlier: from.format(MINUTE_FORMAT).to_string(),
            later: to.format(MINUTE_FORMAT).to_string(),
        });
    }
    Ok((to - from).num_seconds() / 60)
}

/// wall-clock now in the given civil timezone
pub fn now_in(tz: Tz, time_provider: &SafeTimeProvider) -> DateTime<Tz> {
    time_provider.now().with_timezone(&tz)
}

/// parse `YYYYMMDD` (counter entry) or `YYYY-MM-DD`
pub fn parse_compact_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let parsed = if raw.len() == 8 && raw.chars().all(|c| c.is_ascii_digit()) {
        NaiveDate::parse_from_str(raw, "%Y%m%d")
    } else {
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
    };
    parsed.map_err(|_| CalcError::InvalidDate {
        message: format!("올바른 날짜 형식(YYYYMMDD)을 입력하세요: '{}'", raw),
    })
}

/// parse `HHMM` (counter entry) or `HH:MM`
pub fn parse_compact_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    let parsed = if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        NaiveTime::parse_from_str(raw, "%H%M")
    } else {
        NaiveTime::parse_from_str(raw, "%H:%M")
    };
    parsed.map_err(|_| CalcError::InvalidDate {
        message: format!("올바른 시간 형식(HHMM)을 입력하세요: '{}'", raw),
    })
}

/// attach the civil timezone to a wall-clock date and time
pub fn local_instant(date: NaiveDate, time: NaiveTime, tz: Tz) -> Result<DateTime<Tz>> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        // pick earliest
        LocalResult::Ambiguous(dt, _) => Ok(dt),
        LocalResult::None => Err(CalcError::InvalidDate {
            message: format!("{} does not exist in {}", naive, tz.name()),
        }),
    }
}

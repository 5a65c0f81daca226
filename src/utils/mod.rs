use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use chrono_tz::US::Eastern;

/// IANA zone name reported in feed metadata.
pub const FEED_TIMEZONE: &str = "US/Eastern";

/// Convert a UTC instant to Eastern time.
pub fn to_eastern(t: DateTime<Utc>) -> DateTime<Tz> {
    t.with_timezone(&Eastern)
}

/// The Eastern calendar day containing `now`, as a UTC window
/// `[00:00:00, 23:59:59.999999]`. MLB slates are defined by the Eastern day,
/// so the window must be computed in local time before converting out.
pub fn eastern_day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = to_eastern(now).date_naive();

    let start = eastern_local(today.and_time(NaiveTime::MIN));
    let end_time = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    let end = eastern_local(today.and_time(end_time));

    (start.with_timezone(&Utc), end.with_timezone(&Utc))
}

/// Resolve a naive Eastern wall-clock time to an instant. DST transitions
/// happen at 02:00 local, so midnight and 23:59 are never ambiguous; the
/// earliest interpretation is kept as a fallback for completeness.
fn eastern_local(naive: NaiveDateTime) -> DateTime<Tz> {
    Eastern
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Eastern.from_utc_datetime(&naive))
}

/// Format American odds with an explicit plus sign; absent odds are "N/A".
pub fn format_odds(odds: Option<i32>) -> String {
    match odds {
        None => "N/A".to_string(),
        Some(o) if o > 0 => format!("+{}", o),
        Some(o) => o.to_string(),
    }
}

/// Game-time display format, e.g. "07:05 PM EDT".
pub fn format_game_time(t: DateTime<Tz>) -> String {
    t.format("%I:%M %p %Z").to_string()
}

/// Long timestamp format for feed metadata, e.g.
/// "Tuesday, June 03, 2025 at 07:05 PM EDT".
pub fn format_generated_at(t: DateTime<Tz>) -> String {
    t.format("%A, %B %d, %Y at %I:%M %p %Z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_eastern_day_window_summer() {
        // 2025-06-03 10:00 EDT (UTC-4): window is 04:00Z to 03:59:59Z next day.
        let (start, end) = eastern_day_window(utc("2025-06-03T14:00:00+00:00"));
        assert_eq!(start, utc("2025-06-03T04:00:00+00:00"));
        assert_eq!(end, utc("2025-06-04T03:59:59.999999+00:00"));
    }

    #[test]
    fn test_eastern_day_window_winter() {
        // EST is UTC-5.
        let (start, _) = eastern_day_window(utc("2025-01-15T14:00:00+00:00"));
        assert_eq!(start, utc("2025-01-15T05:00:00+00:00"));
    }

    #[test]
    fn test_eastern_day_window_late_utc_evening() {
        // 2025-06-03 23:30 EDT is already 03:30Z on June 4, still June 3 Eastern.
        let (start, _) = eastern_day_window(utc("2025-06-04T03:30:00+00:00"));
        assert_eq!(start, utc("2025-06-03T04:00:00+00:00"));
    }

    #[test]
    fn test_format_odds() {
        assert_eq!(format_odds(Some(102)), "+102");
        assert_eq!(format_odds(Some(-134)), "-134");
        assert_eq!(format_odds(None), "N/A");
    }

    #[test]
    fn test_format_game_time() {
        let t = to_eastern(utc("2025-06-03T23:05:00+00:00"));
        assert_eq!(format_game_time(t), "07:05 PM EDT");
    }
}

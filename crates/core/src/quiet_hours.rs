//! Quiet-hours evaluation.
//!
//! Settings store the window bounds as `HH:MM` wall-clock strings, so the
//! check has to tolerate whatever ended up in those columns. Malformed or
//! missing bounds fail closed -- "not in quiet hours" -- because a bad
//! settings row must never silence every notification for a user.

use chrono::NaiveTime;

/// Parse an `HH:MM` wall-clock string.
///
/// Returns `None` for anything that is not a valid two-field 24h time.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Whether `now` (a local wall-clock time-of-day) falls inside the quiet
/// window `[start, end]`.
///
/// A window whose start is later than its end wraps midnight: 21:00-08:00
/// covers the evening and early morning. Both bounds are inclusive. `None`
/// or unparseable bounds yield `false`.
pub fn is_in_quiet_hours(start: Option<&str>, end: Option<&str>, now: NaiveTime) -> bool {
    let (Some(start), Some(end)) = (start, end) else {
        return false;
    };
    let (Some(start), Some(end)) = (parse_time(start), parse_time(end)) else {
        return false;
    };

    if start <= end {
        start <= now && now <= end
    } else {
        now >= start || now <= end
    }
}

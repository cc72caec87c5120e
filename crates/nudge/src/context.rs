//! Explicit run context for the evaluator.

use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use lumen_core::types::Timestamp;

/// The timezone the evaluator assumes when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Australia::Melbourne;

/// The clock and timezone a single evaluation run operates under.
///
/// Constructed once per run from the wall clock by the schedulers, or from a
/// fixed instant by tests. Rules never call `Utc::now()` themselves; every
/// time-derived condition goes through this context so a run is
/// deterministic for a given `now`.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    /// The instant this run observes.
    pub now: Timestamp,
    /// The timezone quiet hours and "today" are computed in.
    pub tz: Tz,
}

impl RunContext {
    pub fn new(now: Timestamp, tz: Tz) -> Self {
        Self { now, tz }
    }

    /// `now` converted to the configured timezone.
    pub fn local(&self) -> DateTime<Tz> {
        self.now.with_timezone(&self.tz)
    }

    /// Local wall-clock time-of-day, for quiet hours and the focus window.
    pub fn local_time(&self) -> NaiveTime {
        self.local().time()
    }

    /// The local calendar date, for deadline distances and focus plans.
    pub fn today(&self) -> NaiveDate {
        self.local().date_naive()
    }
}

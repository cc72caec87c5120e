//! Nudge rule domain: rule kinds, severities, suppression windows, and the
//! fire-condition logic behind each rule.
//!
//! This module lives in `core` (zero internal deps) so the evaluator engine,
//! the repository layer, and the API all agree on the same closed set of
//! rule tags and severity values. The actual queries live in `lumen-nudge`;
//! everything here is a pure function of already-fetched data, which is what
//! makes the evaluator testable with an injected clock.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of an emitted notification.
///
/// Stored in the `notifications.severity` column as its lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Critical,
}

impl Severity {
    /// The column value for this severity.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Critical => "critical",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity tag: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule kinds
// ---------------------------------------------------------------------------

/// The closed set of notification rules.
///
/// Each variant maps to a stable tag stored in `notifications.rule`, which
/// the duplicate-suppression probe matches on. New rules must be added here
/// so every match over rules stays exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// An active project's deadline is within the next three days and still
    /// has open tasks.
    DeadlineApproaching,
    /// An open task's due date has passed.
    TaskOverdue,
    /// An active project has not been touched for several days.
    ProjectStale,
    /// Today's daily focus plan exists but none of its actions are done.
    FocusNudge,
    /// A recently created document scored poorly against the user's
    /// principles and the user did not override the categorization.
    LowAlignment,
    /// The periodic unread-count digest.
    DailyDigest,
}

impl RuleKind {
    /// The five nudge rules, in the order the evaluator runs them.
    ///
    /// [`RuleKind::DailyDigest`] is excluded: it is driven by its own
    /// scheduler, not the per-user rule pass.
    pub const NUDGE_RULES: [RuleKind; 5] = [
        RuleKind::DeadlineApproaching,
        RuleKind::TaskOverdue,
        RuleKind::ProjectStale,
        RuleKind::FocusNudge,
        RuleKind::LowAlignment,
    ];

    /// The stable tag stored in `notifications.rule`.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::DeadlineApproaching => "deadline_approaching",
            RuleKind::TaskOverdue => "task_overdue",
            RuleKind::ProjectStale => "project_stale",
            RuleKind::FocusNudge => "focus_nudge",
            RuleKind::LowAlignment => "low_alignment",
            RuleKind::DailyDigest => "daily_digest",
        }
    }

    /// The trailing window during which a repeat notification for the same
    /// (user, rule, subject) is withheld.
    pub fn suppression_window(self) -> Duration {
        match self {
            RuleKind::DeadlineApproaching => Duration::hours(6),
            RuleKind::TaskOverdue => Duration::hours(6),
            RuleKind::ProjectStale => Duration::hours(24),
            RuleKind::FocusNudge => Duration::hours(6),
            RuleKind::LowAlignment => Duration::hours(24),
            // Under 24h so a fixed delivery hour doesn't skip every other
            // day when a run lands a few minutes late.
            RuleKind::DailyDigest => Duration::hours(20),
        }
    }
}

impl std::str::FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deadline_approaching" => Ok(RuleKind::DeadlineApproaching),
            "task_overdue" => Ok(RuleKind::TaskOverdue),
            "project_stale" => Ok(RuleKind::ProjectStale),
            "focus_nudge" => Ok(RuleKind::FocusNudge),
            "low_alignment" => Ok(RuleKind::LowAlignment),
            "daily_digest" => Ok(RuleKind::DailyDigest),
            other => Err(format!("unknown rule tag: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity references
// ---------------------------------------------------------------------------

/// A typed reference to the entity a notification is about.
///
/// Also the element type of the `notification_settings.muted_entities` JSON
/// array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_type: String,
    pub entity_id: DbId,
}

impl EntityRef {
    pub fn new(entity_type: &str, entity_id: DbId) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            entity_id,
        }
    }

    pub fn project(id: DbId) -> Self {
        Self::new("project", id)
    }

    pub fn task(id: DbId) -> Self {
        Self::new("task", id)
    }

    pub fn document(id: DbId) -> Self {
        Self::new("document", id)
    }
}

// ---------------------------------------------------------------------------
// Rule thresholds
// ---------------------------------------------------------------------------

/// A deadline counts as approaching when it is at most this many days away.
pub const DEADLINE_HORIZON_DAYS: i64 = 3;

/// Deadlines within this many days are critical rather than warnings.
pub const DEADLINE_CRITICAL_DAYS: i64 = 1;

/// Tasks overdue by strictly more than this many hours are critical.
pub const OVERDUE_CRITICAL_HOURS: i64 = 24;

/// An active project untouched for this many days counts as stale.
pub const STALE_AFTER_DAYS: i64 = 5;

/// The daily-focus nudge only fires inside this local hour (14:00-15:00).
pub const FOCUS_NUDGE_HOUR: u32 = 14;

/// Documents scoring below this are flagged as poorly aligned.
pub const LOW_ALIGNMENT_THRESHOLD: i32 = 60;

/// How far back the low-alignment rule looks for new documents.
pub const LOW_ALIGNMENT_LOOKBACK_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Fire conditions
// ---------------------------------------------------------------------------

/// Decide whether a project-deadline nudge fires, and at what severity.
///
/// Fires only when the deadline is between today and three days out
/// (inclusive) and the project still has open tasks. Today and tomorrow are
/// critical; two and three days out are warnings. Past deadlines are the
/// overdue rule's territory, not this one's.
pub fn deadline_nudge(days_until: i64, open_tasks: i64) -> Option<Severity> {
    if !(0..=DEADLINE_HORIZON_DAYS).contains(&days_until) || open_tasks <= 0 {
        return None;
    }
    if days_until <= DEADLINE_CRITICAL_DAYS {
        Some(Severity::Critical)
    } else {
        Some(Severity::Warn)
    }
}

/// Severity of an overdue-task nudge.
///
/// Strictly more than 24 hours overdue is critical; exactly 24 hours is
/// still a warning.
pub fn overdue_severity(hours_overdue: i64) -> Severity {
    if hours_overdue > OVERDUE_CRITICAL_HOURS {
        Severity::Critical
    } else {
        Severity::Warn
    }
}

/// Whether a project has gone stale.
pub fn is_stale(days_since_update: i64) -> bool {
    days_since_update >= STALE_AFTER_DAYS
}

/// Whether the local wall-clock time is inside the daily-focus nudge window.
pub fn in_focus_nudge_window(local_time: NaiveTime) -> bool {
    use chrono::Timelike;
    local_time.hour() == FOCUS_NUDGE_HOUR
}

/// Whether an alignment score counts as poor.
pub fn is_low_alignment(score: i32) -> bool {
    score < LOW_ALIGNMENT_THRESHOLD
}

// ---------------------------------------------------------------------------
// Delivery gate
// ---------------------------------------------------------------------------

/// Whether a notification of the given severity may be delivered right now.
///
/// Critical notifications always deliver. Anything else is withheld during
/// quiet hours or when the user opted into critical-only delivery.
pub fn should_deliver(severity: Severity, in_quiet_hours: bool, critical_only: bool) -> bool {
    if severity == Severity::Critical {
        return true;
    }
    !in_quiet_hours && !critical_only
}

use crate::{registration::ChatId, shared::entity::WebinarId};
use chrono::{DateTime, Duration, Utc};
use std::fmt::Display;

/// The moments relative to a webinar's start at which participants are notified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    DayBefore,
    HourBefore,
    Start,
}

impl ReminderKind {
    /// Evaluation order, which is also chronological
    pub const ALL: [ReminderKind; 3] = [Self::DayBefore, Self::HourBefore, Self::Start];

    /// How long before the webinar start this reminder fires
    pub fn lead_time(&self) -> Duration {
        match self {
            Self::DayBefore => Duration::hours(24),
            Self::HourBefore => Duration::hours(1),
            Self::Start => Duration::zero(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DayBefore => "day_before",
            Self::HourBefore => "hour_before",
            Self::Start => "start",
        }
    }
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reminder the planner decided should still be sent
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedReminder {
    pub kind: ReminderKind,
    pub fire_at: DateTime<Utc>,
    pub message: String,
}

/// A `ReminderJob` is a single notification to a participant at `fire_at`.
/// It only lives until it has been handed over to the job scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderJob {
    /// The chat that should receive `message`
    pub target: ChatId,
    pub webinar_id: WebinarId,
    pub kind: ReminderKind,
    pub fire_at: DateTime<Utc>,
    pub message: String,
}

impl ReminderJob {
    pub fn new(target: ChatId, webinar_id: WebinarId, reminder: PlannedReminder) -> Self {
        Self {
            target,
            webinar_id,
            kind: reminder.kind,
            fire_at: reminder.fire_at,
            message: reminder.message,
        }
    }

    /// Identifies this reminder across repeated scheduling runs so that the
    /// same participant is never notified twice about the same moment.
    pub fn idempotency_key(&self) -> String {
        reminder_key(self.target, &self.webinar_id, self.kind)
    }
}

/// The idempotency key of the `kind` reminder of `webinar_id` for `target`
pub fn reminder_key(target: ChatId, webinar_id: &WebinarId, kind: ReminderKind) -> String {
    format!("{}:{}:{}", target, webinar_id, kind)
}

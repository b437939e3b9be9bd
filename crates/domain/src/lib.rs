mod date;
mod planner;
mod registration;
mod reminder;
mod shared;
mod webinar;

pub use date::{format_time_of_day, DateParseError, TimeNormalizer};
pub use planner::{ReminderPlanner, MISSING_LINK_PLACEHOLDER};
pub use registration::{ChatId, InvalidIdentityError, Registration, SubjectIdentity};
pub use reminder::{reminder_key, PlannedReminder, ReminderJob, ReminderKind};
pub use shared::entity::{Entity, InvalidIDError, WebinarId};
pub use webinar::Webinar;

use crate::{
    date::format_time_of_day,
    reminder::{PlannedReminder, ReminderKind},
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub const MISSING_LINK_PLACEHOLDER: &str =
    "(the join link is not available yet, please contact the organizer)";

/// Decides which reminders a participant should still receive for a webinar.
///
/// Every `ReminderKind` is evaluated against the webinar start and kept only
/// if it fires strictly after `now`, so late registrations only get the
/// reminders that are still ahead of them.
#[derive(Debug, Clone, Copy)]
pub struct ReminderPlanner {
    /// Zone used when a message mentions a time of day
    display_tz: Tz,
}

impl ReminderPlanner {
    pub fn new(display_tz: Tz) -> Self {
        Self { display_tz }
    }

    pub fn plan(
        &self,
        now: DateTime<Utc>,
        webinar_start: DateTime<Utc>,
        join_link: Option<&str>,
    ) -> Vec<PlannedReminder> {
        ReminderKind::ALL
            .iter()
            .map(|kind| (*kind, webinar_start - kind.lead_time()))
            .filter(|(_, fire_at)| *fire_at > now)
            .map(|(kind, fire_at)| PlannedReminder {
                kind,
                fire_at,
                message: self.message(kind, webinar_start, join_link),
            })
            .collect()
    }

    fn message(
        &self,
        kind: ReminderKind,
        webinar_start: DateTime<Utc>,
        join_link: Option<&str>,
    ) -> String {
        match kind {
            ReminderKind::DayBefore => format!(
                "📅 Reminder: your webinar is tomorrow at {}!",
                format_time_of_day(&webinar_start, &self.display_tz)
            ),
            ReminderKind::HourBefore => "⏳ Just 1 hour left until your webinar!".to_string(),
            ReminderKind::Start => {
                let link = join_link
                    .map(str::trim)
                    .filter(|link| !link.is_empty())
                    .unwrap_or(MISSING_LINK_PLACEHOLDER);
                format!("🚀 Your webinar is starting now! Join: {}", link)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use chrono_tz::Etc::GMTMinus6;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn planner() -> ReminderPlanner {
        ReminderPlanner::new(GMTMinus6)
    }

    #[test]
    fn it_plans_all_reminders_well_ahead_of_start() {
        let start = utc("2025-07-26T04:00:00Z");
        let now = utc("2025-07-24T09:00:00Z");
        let plan = planner().plan(now, start, Some("https://meet.example/w"));

        let fire_times = plan.iter().map(|r| r.fire_at).collect::<Vec<_>>();
        assert_eq!(
            fire_times,
            vec![
                utc("2025-07-25T04:00:00Z"),
                utc("2025-07-26T03:00:00Z"),
                utc("2025-07-26T04:00:00Z"),
            ]
        );
        let kinds = plan.iter().map(|r| r.kind).collect::<Vec<_>>();
        assert_eq!(kinds, ReminderKind::ALL.to_vec());
        assert!(plan[0].message.contains("tomorrow at 10:00"));
        assert!(plan[2].message.ends_with("https://meet.example/w"));
    }

    #[test]
    fn late_registrations_only_get_the_start_reminder() {
        let start = utc("2025-07-26T04:00:00Z");
        let plan = planner().plan(utc("2025-07-26T03:30:00Z"), start, None);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].kind, ReminderKind::Start);
        assert_eq!(plan[0].fire_at, start);
        assert!(plan[0].message.contains(MISSING_LINK_PLACEHOLDER));
    }

    #[test]
    fn reminder_count_follows_the_time_left_until_start() {
        let start = utc("2025-07-26T04:00:00Z");
        let cases = vec![
            (start - Duration::hours(24) - Duration::seconds(1), 3),
            (start - Duration::hours(24), 2),
            (start - Duration::hours(2), 2),
            (start - Duration::hours(1), 1),
            (start - Duration::seconds(1), 1),
            (start, 0),
            (start + Duration::hours(5), 0),
        ];

        for (now, expected) in cases {
            assert_eq!(
                planner().plan(now, start, None).len(),
                expected,
                "now = {}",
                now
            );
        }
    }

    #[test]
    fn blank_links_use_the_placeholder() {
        let start = utc("2025-07-26T04:00:00Z");
        let plan = planner().plan(start - Duration::minutes(5), start, Some("  "));
        assert!(plan[0].message.contains(MISSING_LINK_PLACEHOLDER));
    }
}

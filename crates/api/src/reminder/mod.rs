pub mod schedule_all_reminders;
pub mod schedule_registration_reminders;

use webinar_reminders_infra::Submission;

/// Outcome of handing reminders over to the job scheduler
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleReport {
    /// Jobs that were not queued before
    pub scheduled: usize,
    /// Pending jobs replaced because their webinar was moved or its message changed
    pub rescheduled: usize,
    /// Pending jobs dropped because their reminder is no longer ahead
    pub cancelled: usize,
    /// Jobs already pending or already sent
    pub duplicates: usize,
    /// Registrations that did not produce any jobs because they are invalid
    pub skipped: usize,
}

impl ScheduleReport {
    pub fn record(&mut self, submission: &Submission) {
        match submission {
            Submission::Scheduled(_) => self.scheduled += 1,
            Submission::Rescheduled(_) => self.rescheduled += 1,
            Submission::Duplicate => self.duplicates += 1,
        }
    }

    pub fn merge(&mut self, other: ScheduleReport) {
        self.scheduled += other.scheduled;
        self.rescheduled += other.rescheduled;
        self.cancelled += other.cancelled;
        self.duplicates += other.duplicates;
        self.skipped += other.skipped;
    }

    /// Number of jobs this run added to the queue
    pub fn submitted(&self) -> usize {
        self.scheduled + self.rescheduled
    }
}

use super::ScheduleReport;
use crate::shared::usecase::UseCase;
use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};
use webinar_reminders_domain::{
    reminder_key, DateParseError, InvalidIdentityError, Registration, ReminderJob, ReminderKind,
    Webinar,
};
use webinar_reminders_infra::{JobKey, ReminderContext, Submission};

/// Hands the reminders that are still ahead of a single `Registration` over
/// to the job scheduler. Every reminder is keyed by recipient, webinar and
/// kind, so running this again for the same registration is harmless.
///
/// Pending reminders follow the current state of the webinar. A changed date
/// or message replaces them, and a kind that is no longer ahead is cancelled.
#[derive(Debug)]
pub struct ScheduleRegistrationRemindersUseCase {
    pub registration: Registration,
    pub webinar: Webinar,
}

#[derive(Error, Debug, PartialEq)]
pub enum UseCaseError {
    #[error(transparent)]
    InvalidIdentity(#[from] InvalidIdentityError),
    #[error("Webinar {webinar_id} has an invalid start date: {source}")]
    InvalidDate {
        webinar_id: String,
        #[source]
        source: DateParseError,
    },
}

fn submit(job: ReminderJob, ctx: &ReminderContext) -> Submission {
    let key = JobKey::new(job.idempotency_key()).with_revision(job.message.clone());
    let fire_at = job.fire_at;
    let notifier = ctx.notifier.clone();

    ctx.job_scheduler.submit(fire_at, Some(key), async move {
        notifier
            .deliver(job.target, &job.message)
            .await
            .with_context(|| {
                format!(
                    "Unable to deliver the {} reminder of webinar {} to chat {}",
                    job.kind, job.webinar_id, job.target
                )
            })?;
        info!(
            "Sent the {} reminder of webinar {} to chat {}",
            job.kind, job.webinar_id, job.target
        );
        Ok(())
    })
}

#[async_trait::async_trait]
impl UseCase for ScheduleRegistrationRemindersUseCase {
    type Response = ScheduleReport;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleRegistrationReminders";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let target = self.registration.subject.chat_id()?;
        let webinar_start = ctx
            .normalizer()
            .normalize(&self.webinar.date)
            .map_err(|source| UseCaseError::InvalidDate {
                webinar_id: self.webinar.id.to_string(),
                source,
            })?;

        let now = ctx.sys.now();
        let planned = ctx
            .planner()
            .plan(now, webinar_start, self.webinar.join_link());
        let mut report = ScheduleReport::default();

        // Jobs queued for an earlier date of the webinar
        for kind in ReminderKind::ALL {
            if planned.iter().any(|reminder| reminder.kind == kind) {
                continue;
            }
            let key = JobKey::new(reminder_key(target, &self.webinar.id, kind));
            let due_at = webinar_start - kind.lead_time();
            if ctx.job_scheduler.cancel_key_unless_at(&key, due_at).is_some() {
                info!(
                    "Cancelled the {} reminder of webinar {} for chat {}, it is no longer ahead",
                    kind, self.webinar.id, target
                );
                report.cancelled += 1;
            }
        }

        for reminder in planned {
            let job = ReminderJob::new(target, self.webinar.id.clone(), reminder);
            debug!(
                "Submitting the {} reminder of webinar {} for chat {} at {}",
                job.kind, job.webinar_id, target, job.fire_at
            );
            report.record(&submit(job, ctx));
        }

        Ok(report)
    }
}

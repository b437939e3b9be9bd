use crate::{
    reminder::schedule_all_reminders::ScheduleAllRemindersUseCase, shared::usecase::execute,
};
use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::info;
use webinar_reminders_infra::ReminderContext;

/// Dispatches reminder jobs as they become due
pub fn start_job_scheduler(ctx: ReminderContext, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move { ctx.job_scheduler.run(shutdown).await })
}

/// Rebuilds all reminders right away and then every `reminders_sync_interval`
pub fn start_reminders_sync_job(
    ctx: ReminderContext,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = ctx.config.reminders_sync_interval.max(Duration::from_secs(1));
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    // Errors are logged by the usecase executor, the next tick retries
                    let _ = execute(ScheduleAllRemindersUseCase, &ctx).await;
                }
            }
        }
        info!("Reminders sync job stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::sync::Arc;
    use webinar_reminders_domain::{Registration, SubjectIdentity, Webinar, WebinarId};
    use webinar_reminders_infra::{InMemoryRegistrationRepo, InMemoryWebinarRepo};

    #[tokio::test]
    async fn sync_job_schedules_reminders_on_its_first_tick() {
        let mut ctx = ReminderContext::create_inmemory();
        let start = Utc::now() + ChronoDuration::days(3);
        ctx.repos.webinars = Arc::new(InMemoryWebinarRepo::from(vec![Webinar::new(
            WebinarId::from(1),
            start.to_rfc3339(),
        )]));
        ctx.repos.registrations = Arc::new(InMemoryRegistrationRepo::from(vec![
            Registration::new(SubjectIdentity::new("1001"), WebinarId::from(1)),
        ]));

        let shutdown = CancellationToken::new();
        let handle = start_reminders_sync_job(ctx.clone(), shutdown.clone());

        tokio::time::timeout(Duration::from_secs(5), async {
            while ctx.job_scheduler.pending_count() < 3 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Reminders to be scheduled");

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("Sync job to stop")
            .unwrap();
        assert_eq!(ctx.job_scheduler.pending_count(), 3);
    }
}

use chrono::{DateTime, Utc};
use std::time::Duration;
use webinar_reminders_infra::{InMemoryNotifier, ReminderContext};

/// Runs every job due at `now` to completion
pub async fn dispatch_due(ctx: &ReminderContext, now: DateTime<Utc>) {
    for handle in ctx.job_scheduler.dispatch_due(now) {
        handle.await.expect("Job task to complete");
    }
}

pub async fn wait_for_deliveries(notifier: &InMemoryNotifier, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while notifier.delivered().len() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Reminders to be delivered");
}

use super::{
    schedule_registration_reminders::ScheduleRegistrationRemindersUseCase, ScheduleReport,
};
use crate::shared::usecase::UseCase;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};
use webinar_reminders_domain::{Webinar, WebinarId};
use webinar_reminders_infra::{FetchError, ReminderContext};

/// Rebuilds the reminders of every registration from the store.
///
/// Runs at startup and periodically. A registration that cannot be scheduled
/// is skipped without affecting the others.
#[derive(Debug)]
pub struct ScheduleAllRemindersUseCase;

#[derive(Error, Debug)]
pub enum UseCaseError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[async_trait::async_trait]
impl UseCase for ScheduleAllRemindersUseCase {
    type Response = ScheduleReport;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleAllReminders";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let registrations = ctx.repos.registrations.find_all().await?;
        let webinars: HashMap<WebinarId, Webinar> = ctx
            .repos
            .webinars
            .find_all()
            .await?
            .into_iter()
            .map(|webinar| (webinar.id.clone(), webinar))
            .collect();

        let mut report = ScheduleReport::default();
        for registration in registrations {
            let webinar = match webinars.get(&registration.webinar_id) {
                Some(webinar) => webinar.clone(),
                None => {
                    warn!(
                        "Skipping registration of {} for unknown webinar {}",
                        registration.subject.as_str(),
                        registration.webinar_id
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            let mut usecase = ScheduleRegistrationRemindersUseCase {
                registration,
                webinar,
            };
            match usecase.execute(ctx).await {
                Ok(res) => report.merge(res),
                Err(e) => {
                    warn!(
                        "Skipping registration of {} for webinar {}: {}",
                        usecase.registration.subject.as_str(),
                        usecase.webinar.id,
                        e
                    );
                    report.skipped += 1;
                }
            }
        }

        info!(
            scheduled = report.scheduled,
            rescheduled = report.rescheduled,
            cancelled = report.cancelled,
            already_queued = report.duplicates,
            skipped_registrations = report.skipped,
            "Reminders rebuilt"
        );
        Ok(report)
    }
}

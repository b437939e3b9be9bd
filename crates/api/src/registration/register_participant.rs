use super::subscribers::ScheduleRemindersOnRegistration;
use crate::shared::usecase::{Subscriber, UseCase};
use thiserror::Error;
use tracing::info;
use webinar_reminders_domain::{Registration, Webinar, WebinarId};
use webinar_reminders_infra::{FetchError, ReminderContext};

/// Signs a participant up for a webinar. The reminders for the new
/// registration are scheduled right away instead of waiting for the next
/// periodic rebuild.
#[derive(Debug)]
pub struct RegisterParticipantUseCase {
    pub registration: Registration,
}

#[derive(Debug)]
pub struct RegisteredParticipant {
    pub registration: Registration,
    pub webinar: Webinar,
}

#[derive(Error, Debug)]
pub enum UseCaseError {
    #[error("The webinar with id: {0}, was not found.")]
    WebinarNotFound(WebinarId),
    #[error(transparent)]
    Storage(#[from] FetchError),
}

#[async_trait::async_trait]
impl UseCase for RegisterParticipantUseCase {
    type Response = RegisteredParticipant;

    type Error = UseCaseError;

    const NAME: &'static str = "RegisterParticipant";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let webinar_id = &self.registration.webinar_id;
        let webinar = ctx
            .repos
            .webinars
            .find(webinar_id)
            .await?
            .ok_or_else(|| UseCaseError::WebinarNotFound(webinar_id.clone()))?;

        ctx.repos.registrations.insert(&self.registration).await?;
        info!(
            "Registered {} for webinar {}",
            self.registration.subject.as_str(),
            webinar.id
        );

        Ok(RegisteredParticipant {
            registration: self.registration.clone(),
            webinar,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleRemindersOnRegistration)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use webinar_reminders_domain::SubjectIdentity;
    use webinar_reminders_infra::{InMemoryWebinarRepo, StaticTimeSys};

    fn setup() -> ReminderContext {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut ctx =
            ReminderContext::create_inmemory().with_sys(Arc::new(StaticTimeSys::new(now)));
        let mut webinar = Webinar::new(WebinarId::from(1), "2024-03-05 10:00");
        webinar.link = Some("https://meet.example.com/abc".into());
        ctx.repos.webinars = Arc::new(InMemoryWebinarRepo::from(vec![webinar]));
        ctx
    }

    #[tokio::test]
    async fn registers_and_schedules_reminders() {
        let ctx = setup();
        let mut registration =
            Registration::new(SubjectIdentity::new("1001"), WebinarId::from(1));
        registration.full_name = Some("Ada Lovelace".into());

        let res = execute(
            RegisterParticipantUseCase {
                registration: registration.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(res.registration, registration);
        assert_eq!(
            ctx.repos.registrations.find_all().await.unwrap(),
            vec![registration]
        );
        assert_eq!(ctx.job_scheduler.pending_count(), 3);
    }

    #[tokio::test]
    async fn rejects_unknown_webinars() {
        let ctx = setup();
        let mut usecase = RegisterParticipantUseCase {
            registration: Registration::new(SubjectIdentity::new("1001"), WebinarId::from(2)),
        };

        let res = usecase.execute(&ctx).await;

        assert!(matches!(res, Err(UseCaseError::WebinarNotFound(id)) if id == WebinarId::from(2)));
        assert!(ctx.repos.registrations.find_all().await.unwrap().is_empty());
        assert_eq!(ctx.job_scheduler.pending_count(), 0);
    }
}

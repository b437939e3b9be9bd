use super::register_participant::{RegisterParticipantUseCase, RegisteredParticipant};
use crate::reminder::schedule_registration_reminders::ScheduleRegistrationRemindersUseCase;
use crate::shared::usecase::{execute, Subscriber};
use webinar_reminders_infra::ReminderContext;

pub struct ScheduleRemindersOnRegistration;

#[async_trait::async_trait]
impl Subscriber<RegisterParticipantUseCase> for ScheduleRemindersOnRegistration {
    async fn notify(&self, e: &RegisteredParticipant, ctx: &ReminderContext) {
        let schedule_reminders = ScheduleRegistrationRemindersUseCase {
            registration: e.registration.clone(),
            webinar: e.webinar.clone(),
        };

        // Sideeffect, ignore result
        let _ = execute(schedule_reminders, ctx).await;
    }
}

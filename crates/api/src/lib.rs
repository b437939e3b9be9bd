mod job_schedulers;
mod registration;
mod reminder;
mod shared;

use futures::future::join_all;
use job_schedulers::{start_job_scheduler, start_reminders_sync_job};
pub use registration::register_participant::{
    RegisterParticipantUseCase, RegisteredParticipant, UseCaseError as RegisterParticipantError,
};
pub use reminder::{
    schedule_all_reminders::{
        ScheduleAllRemindersUseCase, UseCaseError as ScheduleAllRemindersError,
    },
    schedule_registration_reminders::{
        ScheduleRegistrationRemindersUseCase, UseCaseError as ScheduleRegistrationRemindersError,
    },
    ScheduleReport,
};
pub use shared::usecase::{execute, Subscriber, UseCase};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use webinar_reminders_infra::ReminderContext;

/// The running reminder service: the job scheduler loop and the periodic
/// reminders rebuild.
pub struct Application {
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Application {
    pub fn new(context: ReminderContext) -> Self {
        let shutdown = CancellationToken::new();
        let tasks = Application::start_job_schedulers(context, shutdown.clone());

        Self { shutdown, tasks }
    }

    fn start_job_schedulers(
        context: ReminderContext,
        shutdown: CancellationToken,
    ) -> Vec<JoinHandle<()>> {
        vec![
            start_job_scheduler(context.clone(), shutdown.clone()),
            start_reminders_sync_job(context, shutdown),
        ]
    }

    /// Token that stops the application when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Runs until the process receives Ctrl-C or SIGTERM, or until the
    /// shutdown token is cancelled
    pub async fn start(self) {
        tokio::select! {
            _ = shutdown_signal() => {}
            _ = self.shutdown.cancelled() => {}
        }
        self.stop().await;
    }

    /// Stops all background jobs. Reminders that have not fired yet are dropped.
    pub async fn stop(self) {
        self.shutdown.cancel();
        for res in join_all(self.tasks).await {
            if let Err(e) = res {
                error!("Background job ended abnormally: {:?}", e);
            }
        }
        info!("Application stopped");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for Ctrl+C: {:?}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Unable to listen for SIGTERM: {:?}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn stops_when_the_shutdown_token_is_cancelled() {
        let app = Application::new(ReminderContext::create_inmemory());
        let shutdown = app.shutdown_token();
        let running = tokio::spawn(app.start());

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), running)
            .await
            .expect("Application to stop")
            .unwrap();
    }
}

mod config;
mod job_scheduler;
mod repos;
mod services;
mod system;

pub use config::{Config, ConfigError, SupabaseConfig, TelegramConfig};
pub use job_scheduler::{JobId, JobKey, JobScheduler, JobTask, Submission};
pub use repos::{
    FetchError, IRegistrationRepo, IWebinarRepo, InMemoryRegistrationRepo, InMemoryWebinarRepo,
    Repos,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use webinar_reminders_domain::{ReminderPlanner, TimeNormalizer};

#[derive(Clone)]
pub struct ReminderContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotificationSink>,
    pub job_scheduler: JobScheduler,
}

impl ReminderContext {
    fn new(
        repos: Repos,
        config: Config,
        sys: Arc<dyn ISys>,
        notifier: Arc<dyn INotificationSink>,
    ) -> Self {
        let job_scheduler = JobScheduler::new(
            sys.clone(),
            config.job_scheduler_poll_interval,
            config.fired_reminders_retention,
        );
        Self {
            repos,
            config,
            sys,
            notifier,
            job_scheduler,
        }
    }

    /// Context without any external dependencies. Nothing leaves the process:
    /// registrations are kept in memory and messages are only recorded.
    pub fn create_inmemory() -> Self {
        let config = Config::with_credentials(
            SupabaseConfig {
                url: "http://localhost:54321".into(),
                api_key: "inmemory".into(),
            },
            TelegramConfig {
                api_url: "http://localhost:8081".into(),
                bot_token: "inmemory".into(),
            },
        );
        Self::new(
            Repos::create_inmemory(),
            config,
            Arc::new(RealSys {}),
            Arc::new(InMemoryNotifier::new()),
        )
    }

    /// Replaces the clock. The job scheduler is recreated so that it reads
    /// the same clock, which drops every job submitted so far.
    pub fn with_sys(self, sys: Arc<dyn ISys>) -> Self {
        Self::new(self.repos, self.config, sys, self.notifier)
    }

    pub fn normalizer(&self) -> TimeNormalizer {
        TimeNormalizer::new(self.config.local_timezone)
    }

    pub fn planner(&self) -> ReminderPlanner {
        ReminderPlanner::new(self.config.local_timezone)
    }
}

/// Will setup the infrastructure context given the config
pub fn setup_context(config: Config) -> anyhow::Result<ReminderContext> {
    let repos = Repos::create_supabase(&config.supabase, config.http_timeout)?;
    let notifier = TelegramNotifier::new(&config.telegram, config.http_timeout)?;
    Ok(ReminderContext::new(
        repos,
        config,
        Arc::new(RealSys {}),
        Arc::new(notifier),
    ))
}

use chrono::{DateTime, Utc};
use std::sync::Arc;
use webinar_reminders_api::Application;
use webinar_reminders_infra::{
    InMemoryNotifier, InMemoryRegistrationRepo, InMemoryWebinarRepo, ReminderContext,
    StaticTimeSys,
};

pub struct TestContext {
    pub ctx: ReminderContext,
    pub notifier: Arc<InMemoryNotifier>,
    pub webinars: Arc<InMemoryWebinarRepo>,
}

fn inmemory_context(ctx: ReminderContext) -> TestContext {
    let mut ctx = ctx;
    let notifier = Arc::new(InMemoryNotifier::new());
    let webinars = Arc::new(InMemoryWebinarRepo::new());
    ctx.notifier = notifier.clone();
    ctx.repos.webinars = webinars.clone();
    ctx.repos.registrations = Arc::new(InMemoryRegistrationRepo::new());
    TestContext {
        ctx,
        notifier,
        webinars,
    }
}

/// Context on a clock that only moves when the test moves it. Jobs are
/// dispatched by calling `dispatch_due` directly.
pub fn setup_at(now: DateTime<Utc>) -> (TestContext, Arc<StaticTimeSys>) {
    let sys = Arc::new(StaticTimeSys::new(now));
    let ctx = ReminderContext::create_inmemory().with_sys(sys.clone());
    (inmemory_context(ctx), sys)
}

// Launch the application as a background task on the real clock
pub fn spawn_app() -> (TestContext, Application) {
    let test_ctx = inmemory_context(ReminderContext::create_inmemory());
    let application = Application::new(test_ctx.ctx.clone());
    (test_ctx, application)
}

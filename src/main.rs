mod telemetry;

use telemetry::{get_subscriber, init_subscriber};
use tracing::info;
use webinar_reminders_api::Application;
use webinar_reminders_infra::{setup_context, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let subscriber = get_subscriber("webinar_reminders".into(), "info".into());
    init_subscriber(subscriber)?;

    let config = Config::new()?;
    info!(
        "Starting webinar reminders for timezone {}",
        config.local_timezone
    );
    let context = setup_context(config)?;

    let app = Application::new(context);
    app.start().await;
    Ok(())
}

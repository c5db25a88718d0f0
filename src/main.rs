use std::io;

use portfolio::configuration::Settings;
use portfolio::startup::Application;
use portfolio::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = get_subscriber("portfolio".into(), "info".into(), io::stdout);
    init_subscriber(subscriber);

    // Retrieve settings
    let config = Settings::get_config()?;

    // Build and run the application
    let application = Application::build(config)?;
    tracing::info!(port = application.port(), "Server listening");
    application.run_until_stopped().await?;

    Ok(())
}

use launch_waitlist::configuration::get_configuration;
use launch_waitlist::startup::Application;
use launch_waitlist::telemetry::get_subscriber;
use launch_waitlist::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // only logs at the specified level and higher are emitted; `RUST_LOG`
    // overrides it
    let subscriber = get_subscriber("launch-waitlist", "info", std::io::stdout);
    init_subscriber(subscriber);

    let cfg = get_configuration()?;
    let app = Application::build(cfg).await?;
    tracing::info!("listening on port {}", app.port());

    if let Err(e) = app.run_until_stopped().await {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "server failed"
        );
        return Err(e.into());
    }
    tracing::info!("server exited gracefully");
    Ok(())
}

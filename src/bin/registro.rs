use anyhow::Result;
use registro::{cli, vault::SecretProviderUnavailable};
use tracing::error;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let action = cli::start()?;

    let result = action.execute().await;

    cli::telemetry::shutdown_tracer();

    if let Err(err) = result {
        // A missing secret means the service cannot answer logins at all,
        // abort before ever binding the listener.
        if err.downcast_ref::<SecretProviderUnavailable>().is_some() {
            error!("{err:#}");
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}

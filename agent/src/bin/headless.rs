//! Headless agent binary.
//!
//! Reads host events as JSON lines on stdin and runs them through the
//! push agent against the configured portal.

use tracing_subscriber::EnvFilter;

use portal_push_agent_lib::host;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting portal push agent (headless mode)");

    let config = portal_push_agent_lib::init_config()?;
    let (agent, platform) = portal_push_agent_lib::build_agent(&config);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let handled = host::run_event_loop(agent, platform, stdin).await?;

    tracing::info!(handled, "Input closed, agent stopped");
    Ok(())
}

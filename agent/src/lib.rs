//! Host adapter for the portal push agent.
//!
//! Loads configuration, binds the agent's ports (portal REST client for
//! remote state, in-memory host for the notification surface) and feeds
//! host events into the dispatcher.

pub mod config;
pub mod host;

use std::sync::Arc;

use portal_client::PortalApiClient;
use push_agent::memory::MemoryHost;
use push_agent::ports::AppBadge;
use push_agent::{Agent, HostPorts};

use config::{AgentConfig, SettingsManager};

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load .env and environment settings, then the runtime config.
pub fn init_config() -> Result<AgentConfig, anyhow::Error> {
    load_dotenv();

    let sm = SettingsManager::from_env();
    let config = AgentConfig::load(&sm)?;

    tracing::info!(
        origin = %config.origin,
        rest_path = %config.rest_path,
        session_cookie = %sm.display_value("PORTAL_SESSION_COOKIE"),
        "Settings loaded"
    );
    Ok(config)
}

/// Build the agent and the headless host backing its platform ports.
pub fn build_agent(config: &AgentConfig) -> (Agent, Arc<MemoryHost>) {
    let host = Arc::new(MemoryHost::new());
    host.set_permission(config.permission);
    host.set_max_actions(config.max_actions);

    let remote = PortalApiClient::new(config.origin.clone(), config.rest_path.clone())
        .with_session_cookie(config.session_cookie.clone());

    let ports = HostPorts {
        permission: host.clone(),
        notifications: host.clone(),
        badge: config
            .badge_supported
            .then(|| host.clone() as Arc<dyn AppBadge>),
        windows: host.clone(),
        remote: Arc::new(remote),
    };
    (Agent::new(ports, config.agent_settings()), host)
}

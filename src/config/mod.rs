use std::env;

use crate::naming::NamingConvention;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub db_max_connections: u32,
    pub listen_addr: String,
    /// Which VLAN naming convention this deployment uses. A deployment
    /// choice, never a per-request one.
    pub vlan_naming: NamingConvention,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        let vlan_naming = match get_env("VLAN_NAMING", "domain").parse() {
            Ok(convention) => convention,
            Err(e) => {
                tracing::warn!("{} - falling back to the domain convention", e);
                NamingConvention::Domain
            }
        };

        Self {
            db_path: get_env("DB_PATH", "/data/fabric.db"),
            db_max_connections: get_env("DB_MAX_CONNECTIONS", "5").parse().unwrap_or(5),
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8080"),
            vlan_naming,
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

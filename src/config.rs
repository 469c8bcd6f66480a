use std::net::SocketAddr;

use anyhow::Context;

/// Server settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Without a database the planner lives in memory for the life of the process.
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: None,
            max_connections: 5,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = match std::env::var("BIND_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("BIND_ADDR is not a socket address: {}", raw))?,
            Err(_) => defaults.bind_addr,
        };

        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {}", raw))?,
            Err(_) => defaults.max_connections,
        };

        Ok(Self {
            bind_addr,
            database_url: std::env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            max_connections,
        })
    }
}

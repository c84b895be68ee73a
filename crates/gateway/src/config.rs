//! Gateway configuration.

use common::{env_var, ServerConfig};

/// HTTP gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayConfig {
    pub server: ServerConfig,
}

impl GatewayConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            server: ServerConfig::from_lookup(lookup),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(&env_var)
    }

    /// Override the bind host (from the command line).
    pub fn with_host(mut self, host: Option<String>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        self
    }

    /// Override the bind port (from the command line).
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    pub fn addr(&self) -> String {
        self.server.addr()
    }
}

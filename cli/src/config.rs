//! Connection settings resolved from the command line.

use std::fmt;

use meili_core::MeiliClient;

use crate::cli::{Cli, DEFAULT_HOST, DEFAULT_PORT};

/// Where to connect and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
        }
    }
}

impl From<&Cli> for ClientConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            host: cli.host.clone(),
            port: cli.port,
            api_key: cli.api_key.clone(),
        }
    }
}

impl ClientConfig {
    /// Request builder bound to this host and key.
    pub fn client(&self) -> MeiliClient {
        MeiliClient::new(&self.host, self.api_key.as_deref())
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

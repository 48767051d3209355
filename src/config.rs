use std::env;
use std::time::Duration;

/// Environment variable that overrides the queue server port.
pub const PORT_ENV_VAR: &str = "MINIQ_PORT";

/// Port used when [`PORT_ENV_VAR`] is not set.
pub const DEFAULT_PORT: u16 = 9876;

/// Where the client connects and how long it is willing to wait.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host the queue server runs on.
    pub host: String,
    /// Port the queue server listens on.
    pub port: u16,
    /// Bound on connecting and on awaiting the reply.
    /// `None` blocks indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            port: parse_port(env::var(PORT_ENV_VAR).ok().as_deref()),
            ..Self::default()
        }
    }

    /// The WebSocket endpoint this config points at.
    pub fn endpoint(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

fn parse_port(value: Option<&str>) -> u16 {
    match value {
        None => DEFAULT_PORT,
        Some(raw) => match raw.parse() {
            Ok(port) => port,
            Err(_) => {
                tracing::warn!(value = raw, "Invalid MINIQ_PORT, using default port");
                DEFAULT_PORT
            }
        },
    }
}

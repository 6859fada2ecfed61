//! Configuration loading for drugsim.
//! Reads drugsim.toml from the current directory or the path in DRUGSIM_CONFIG.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use drugsim_common::Variant;
use drugsim_model::ModelConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16    { 3001 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub variant: Variant,
    /// Seeds every session's randomizer; omit for OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_ttl_secs()     -> u64   { 3600 }
fn default_max_sessions() -> usize { 1024 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_secs: default_ttl_secs(), max_sessions: default_max_sessions() }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}


impl Config {
    /// Load configuration from drugsim.toml.
    /// Checks DRUGSIM_CONFIG env var first, then current directory. A missing
    /// file yields the defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("DRUGSIM_CONFIG")
            .unwrap_or_else(|_| "drugsim.toml".to_string());

        if !Path::new(&path).exists() {
            tracing::warn!("Config file not found: {}; using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.model.epochs == 0 || self.model.samples == 0 {
            anyhow::bail!("model.epochs and model.samples must be positive");
        }
        if self.model.timeout_secs == 0 {
            anyhow::bail!("model.timeout_secs must be positive");
        }
        if self.sessions.ttl_secs == 0 {
            anyhow::bail!("sessions.ttl_secs must be positive");
        }
        if self.sessions.max_sessions == 0 {
            anyhow::bail!("sessions.max_sessions must be positive");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port).parse()?;
        Ok(addr)
    }
}

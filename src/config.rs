//! Configuration for need-a-number

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Serving runtime settings
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Isolated runtime used for offloaded work
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// Number endpoint settings
    #[serde(default)]
    pub number: NumberConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Worker threads accepting and serving requests
    #[serde(default = "default_runtime_workers")]
    pub worker_threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Async worker threads of the dispatcher runtime
    #[serde(default = "default_dispatcher_workers")]
    pub worker_threads: usize,

    /// Upper bound on threads running blocking work
    #[serde(default = "default_max_blocking_threads")]
    pub max_blocking_threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberConfig {
    /// Artificial delay of the slow endpoints, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_runtime_workers(),
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_dispatcher_workers(),
            max_blocking_threads: default_max_blocking_threads(),
        }
    }
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

impl Config {
    /// Load config from an explicit path, the default location, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Ok(default_path) if default_path.exists() => Self::from_file(&default_path),
            _ => Ok(Config::default()),
        }
    }

    /// Load config from a TOML file that must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Write this config to `path`, or to the default location when omitted
    pub fn init_file(&self, path: Option<PathBuf>) -> Result<PathBuf> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        tracing::info!("Writing config to {:?}", path);
        self.save(&path)?;
        Ok(path)
    }

    /// Get the default config path
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".into()))?;
        Ok(dir.join("need-a-number").join("config.toml"))
    }

    /// Reject settings the runtimes cannot be built with
    pub fn validate(&self) -> Result<()> {
        if self.runtime.worker_threads == 0 {
            return Err(Error::Config("runtime.worker_threads must be at least 1".into()));
        }
        if self.dispatcher.worker_threads == 0 {
            return Err(Error::Config("dispatcher.worker_threads must be at least 1".into()));
        }
        if self.dispatcher.max_blocking_threads == 0 {
            return Err(Error::Config(
                "dispatcher.max_blocking_threads must be at least 1".into(),
            ));
        }
        self.addr()?;
        Ok(())
    }

    /// Socket address to listen on
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid listen address: {}", e)))
    }

    /// Delay applied by the slow endpoints
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.number.delay_ms)
    }
}

// Default value functions

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_runtime_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_dispatcher_workers() -> usize {
    2
}

fn default_max_blocking_threads() -> usize {
    64
}

fn default_delay_ms() -> u64 {
    1_000
}

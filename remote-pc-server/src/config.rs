use anyhow::{bail, Context, Result};
use remote_pc_executor::KeyTiming;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CONFIG_PATH: &str = "remote-pc.yaml";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Upper bound for utility commands (kill, process list, power).
    /// Absent means wait indefinitely.
    pub command_timeout_ms: Option<u64>,
    pub key_timing: KeyTimingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            log_level: "info".to_string(),
            command_timeout_ms: None,
            key_timing: KeyTimingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyTimingConfig {
    pub hold_ms: u64,
    pub volume_pace_ms: u64,
    pub brightness_pace_ms: u64,
    pub combo_gap_ms: u64,
}

impl Default for KeyTimingConfig {
    fn default() -> Self {
        Self {
            hold_ms: 50,
            volume_pace_ms: 100,
            brightness_pace_ms: 200,
            combo_gap_ms: 50,
        }
    }
}

impl KeyTimingConfig {
    pub fn to_timing(self) -> KeyTiming {
        KeyTiming {
            hold: Duration::from_millis(self.hold_ms),
            volume_pace: Duration::from_millis(self.volume_pace_ms),
            brightness_pace: Duration::from_millis(self.brightness_pace_ms),
            combo_gap: Duration::from_millis(self.combo_gap_ms),
        }
    }
}

impl ServerConfig {
    /// Read the YAML file at `path`. Without an explicit path the default
    /// file is optional and its absence yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };

        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `REMOTE_PC_*` overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("REMOTE_PC_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("REMOTE_PC_PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("REMOTE_PC_PORT is not a valid port: {port}"))?;
        }
        if let Some(level) = lookup("REMOTE_PC_LOG") {
            self.log_level = level;
        }
        if let Some(timeout) = lookup("REMOTE_PC_COMMAND_TIMEOUT_MS") {
            let timeout = timeout.trim();
            self.command_timeout_ms = if timeout.is_empty() {
                None
            } else {
                Some(timeout.parse().with_context(|| {
                    format!("REMOTE_PC_COMMAND_TIMEOUT_MS is not a number: {timeout}")
                })?)
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            bail!("host must not be empty");
        }
        if self.port == 0 {
            bail!("port must be between 1 and 65535");
        }
        if self.command_timeout_ms == Some(0) {
            bail!("command_timeout_ms must be positive when set");
        }
        let level = self.log_level.trim().to_ascii_lowercase();
        if level.contains('=') || level.contains(',') {
            EnvFilter::try_new(&level)
                .with_context(|| format!("Invalid log_level: {}", self.log_level))?;
        } else if !LOG_LEVELS.contains(&level.as_str()) {
            bail!(
                "Invalid log_level: {} (expected one of {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            );
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_ms.map(Duration::from_millis)
    }
}

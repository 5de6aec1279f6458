//! Configuration loading for the engine binary.
//!
//! The canonical configuration lives in `polity-config.yaml` next to the
//! binary. Every section has defaults, so a missing file or a missing
//! section both fall back cleanly rather than erroring.

use std::path::Path;

use polity_advisors::BackendType;
use serde::Deserialize;

/// Errors while loading or parsing the engine's configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file existed but could not be read.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
    /// The file's contents were not valid YAML for this shape.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration, mirroring `polity-config.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// HTTP bind settings.
    #[serde(default)]
    pub server: ServerConfigSection,
    /// Persistence backend.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Advisor (LLM) transport settings.
    #[serde(default)]
    pub advisor: AdvisorConfigSection,
    /// Per-game defaults and scheduler tuning.
    #[serde(default)]
    pub game: GameConfigSection,
}

impl EngineConfig {
    /// Load configuration from `path`, or fall back to defaults if the
    /// file does not exist.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_yml::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables override file values, the way the teacher's
    /// `InfrastructureConfig::apply_env_overrides` layers Docker Compose
    /// env vars over `emergence-config.yaml`.
    ///
    /// - `DATABASE_URL` overrides `database.url`
    /// - `AI_API_KEY` overrides `advisor.api_key`
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("AI_API_KEY") {
            self.advisor.api_key = val;
        }
    }
}

/// HTTP bind settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfigSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfigSection {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8080
}

/// Persistence backend selection and connection string.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string. Empty selects the in-memory store.
    #[serde(default)]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: String::new() }
    }
}

/// Advisor transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfigSection {
    /// Which provider to call.
    #[serde(default = "default_backend")]
    pub backend: BackendType,
    /// Base API URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Secret API key; normally supplied via `AI_API_KEY`.
    #[serde(default)]
    pub api_key: String,
    /// Model identifier; empty selects the backend's default.
    #[serde(default)]
    pub model: String,
    /// Per-stage transport timeout, in seconds.
    #[serde(default = "default_stage_timeout_secs")]
    pub stage_timeout_secs: u64,
}

impl Default for AdvisorConfigSection {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            api_url: default_api_url(),
            api_key: String::new(),
            model: String::new(),
            stage_timeout_secs: default_stage_timeout_secs(),
        }
    }
}

fn default_backend() -> BackendType {
    BackendType::OpenAi
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".to_owned()
}

fn default_stage_timeout_secs() -> u64 {
    10
}

/// Per-game defaults and the scheduler's catch-up bound.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfigSection {
    /// `tick_interval_hours` new games are created with.
    #[serde(default = "default_tick_interval_hours")]
    pub tick_interval_hours: u32,
    /// Maximum bound players per game.
    #[serde(default = "default_max_players")]
    pub max_players_per_server: usize,
    /// How many missed ticks a restart will fast-forward through before
    /// giving up and dropping the rest, logged at `warn`.
    #[serde(default = "default_max_catchup_ticks")]
    pub max_catchup_ticks: u32,
    /// How often the scheduler polls every game's deadline, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for GameConfigSection {
    fn default() -> Self {
        Self {
            tick_interval_hours: default_tick_interval_hours(),
            max_players_per_server: default_max_players(),
            max_catchup_ticks: default_max_catchup_ticks(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_tick_interval_hours() -> u32 {
    1
}

fn default_max_players() -> usize {
    6
}

fn default_max_catchup_ticks() -> u32 {
    50
}

fn default_poll_interval_secs() -> u64 {
    60
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = EngineConfig::load(Path::new("/nonexistent/polity-config.yaml")).expect("no io error");
        assert_eq!(config.game.tick_interval_hours, 1);
        assert_eq!(config.game.max_catchup_ticks, 50);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let yaml = "game:\n  tick_interval_hours: 2\n";
        let config: EngineConfig = serde_yml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.game.tick_interval_hours, 2);
        assert_eq!(config.game.max_players_per_server, 6);
        assert_eq!(config.server.port, 8080);
    }
}

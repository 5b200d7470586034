use cadenza_config::{ConfigBackend, ConfigError, CONFIG_BACKEND};
use cadenza_core::services::BrowseLimits;
use cadenza_import::ImportConfig;
use cadenza_storage::config::StorageConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
  /// Default `env_logger` filter (`error`, `warn`, `info`, `debug`, `trace`).
  #[serde(default = "default_level")]
  pub level: String,
}

fn default_level() -> String {
  "info".to_string()
}

impl Default for LoggingConfig {
  fn default() -> Self {
    LoggingConfig { level: default_level() }
  }
}

impl LoggingConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("logging")?;
    CONFIG_BACKEND.save_section("logging", &cfg)?;
    Ok(cfg)
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BrowseConfig {
  #[serde(default = "default_limit")]
  pub default_limit: u32,
  #[serde(default = "max_limit")]
  pub max_limit: u32,
}

fn default_limit() -> u32 {
  50
}

fn max_limit() -> u32 {
  200
}

impl Default for BrowseConfig {
  fn default() -> Self {
    BrowseConfig { default_limit: default_limit(), max_limit: max_limit() }
  }
}

impl BrowseConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("browse")?;
    CONFIG_BACKEND.save_section("browse", &cfg)?;
    Ok(cfg)
  }
}

impl From<BrowseConfig> for BrowseLimits {
  fn from(cfg: BrowseConfig) -> Self {
    // a default above the maximum is clamped rather than rejected
    let max_limit = cfg.max_limit.max(1);
    BrowseLimits { default_limit: cfg.default_limit.clamp(1, max_limit), max_limit }
  }
}

/// Every config section, as the process sees it.
#[derive(Debug, Serialize)]
pub struct EffectiveConfig {
  pub storage: StorageConfig,
  pub import: ImportConfig,
  pub browse: BrowseConfig,
  pub logging: LoggingConfig,
}

impl EffectiveConfig {
  pub fn load() -> Result<Self, ConfigError> {
    Ok(EffectiveConfig {
      storage: StorageConfig::load()?,
      import: ImportConfig::load()?,
      browse: BrowseConfig::load()?,
      logging: LoggingConfig::load()?,
    })
  }

  pub fn to_toml(&self) -> Result<String, ConfigError> {
    toml::to_string_pretty(self).map_err(|e| ConfigError::Section { section: "*".to_string(), reason: e.to_string() })
  }
}

use cadenza_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
  pub db_path: PathBuf,

  /// `PRAGMA journal_mode` aplicado a cada conexión del pool.
  pub journal_mode: Option<String>,

  /// Conexiones máximas del pool.
  #[serde(default = "default_pool_size")]
  pub pool_size: u32,
}

fn default_pool_size() -> u32 {
  4
}

impl Default for StorageConfig {
  fn default() -> Self {
    let db_path = PATHS.data_dir.join("cadenza.db");
    StorageConfig { db_path, journal_mode: Some("WAL".to_string()), pool_size: default_pool_size() }
  }
}

impl StorageConfig {
  /// Config con una base de datos concreta y el resto por defecto.
  pub fn at(db_path: impl Into<PathBuf>) -> Self {
    StorageConfig { db_path: db_path.into(), journal_mode: Some("WAL".to_string()), pool_size: default_pool_size() }
  }

  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("storage")?;
    CONFIG_BACKEND.save_section("storage", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("storage", self)
  }
}

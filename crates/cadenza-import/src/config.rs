use cadenza_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImportConfig {
  /// Filas por transacción.
  #[serde(default = "default_batch_size")]
  pub batch_size: usize,

  /// Separador de columnas del CSV (un único carácter ASCII).
  #[serde(default = "default_delimiter")]
  pub delimiter: char,
}

fn default_batch_size() -> usize {
  500
}

fn default_delimiter() -> char {
  ','
}

impl Default for ImportConfig {
  fn default() -> Self {
    ImportConfig { batch_size: default_batch_size(), delimiter: default_delimiter() }
  }
}

impl ImportConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("import")?;
    CONFIG_BACKEND.save_section("import", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("import", self)
  }
}

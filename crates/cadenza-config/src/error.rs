use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid config file: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("could not determine the user's home directory")]
  NoHomeDir,

  #[error("missing section [{section}] in {}", path.display())]
  MissingSection { section: String, path: PathBuf },

  /// La sección existe pero no encaja con el tipo pedido, o no se pudo serializar.
  #[error("section [{section}]: {reason}")]
  Section { section: String, reason: String },
}

impl ConfigError {
  pub(crate) fn section(section: &str, reason: impl ToString) -> Self {
    ConfigError::Section { section: section.to_string(), reason: reason.to_string() }
  }
}

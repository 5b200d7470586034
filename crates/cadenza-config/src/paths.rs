use std::ffi::OsString;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::ConfigError;

/// Variable de entorno que fuerza un directorio base (modo portable).
pub const BASE_DIR_ENV: &str = "CADENZA_BASE_DIR";

const CONFIG_FILE: &str = "cadenza.toml";

/// Dónde viven el fichero de config y la base de datos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadenzaPaths {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl CadenzaPaths {
  /// `$CADENZA_BASE_DIR` si está definida; si no, los directorios de la plataforma.
  pub fn new() -> Result<Self, ConfigError> {
    Self::resolve(std::env::var_os(BASE_DIR_ENV))
  }

  fn resolve(base_override: Option<OsString>) -> Result<Self, ConfigError> {
    match base_override.filter(|b| !b.is_empty()) {
      Some(base) => Self::under(base),
      None => {
        let dirs = ProjectDirs::from("com", "cadenza", "cadenza").ok_or(ConfigError::NoHomeDir)?;
        Self::at(dirs.config_dir().to_path_buf(), dirs.data_dir().to_path_buf())
      }
    }
  }

  /// `config/` y `data/` bajo un único directorio.
  pub fn under(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let base = base.into();
    Self::at(base.join("config"), base.join("data"))
  }

  /// Paths explícitos; crea los directorios si no existen.
  pub fn at(config_dir: PathBuf, data_dir: PathBuf) -> Result<Self, ConfigError> {
    std::fs::create_dir_all(&config_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok(Self { config_dir, data_dir })
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE)
  }
}

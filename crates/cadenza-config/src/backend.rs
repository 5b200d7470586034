use crate::io::atomic_write_str;
use crate::error::ConfigError;
use crate::paths::CadenzaPaths;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

// toml_edit para escribir sin perder comentarios del usuario
use toml_edit::{DocumentMut, Item};

/// Lectura y escritura de secciones (`[storage]`, `[import]`, ...) del fichero de config.
pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  paths: CadenzaPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: CadenzaPaths) -> Self {
    Self { paths }
  }

  pub fn config_file(&self) -> PathBuf {
    self.paths.config_file()
  }

  /// Contenido del fichero, o `None` si todavía no existe.
  fn read_config(&self) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(self.paths.config_file()) {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  /// Igual que [`ConfigBackend::load_section`], pero un fichero o sección
  /// ausente da `T::default()`. Los campos ausentes dentro de la sección se
  /// rellenan con los `#[serde(default)]` del tipo.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let Some(content) = self.read_config()? else {
      return Ok(T::default());
    };

    let toml_val: toml::Value = toml::from_str(&content)?;

    match toml_val.get(section) {
      Some(table) => decode_section(section, table),
      None => Ok(T::default()),
    }
  }
}

fn decode_section<T: DeserializeOwned>(section: &str, table: &toml::Value) -> Result<T, ConfigError> {
  table.clone().try_into().map_err(|e| ConfigError::section(section, e))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let content = fs::read_to_string(&path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::MissingSection { section: section.to_string(), path: path.clone() })?;

    decode_section(section, table)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    // 1) Documento actual (con sus comentarios) o uno vacío.
    let mut doc: DocumentMut = match self.read_config()? {
      Some(content) => {
        content.parse::<DocumentMut>().map_err(|e| ConfigError::section(section, e))?
      }
      None => DocumentMut::new(),
    };

    // 2) La sección se serializa con `toml` y se vuelve a leer como tabla de
    //    toml_edit: "foo = 1\nbar = 2\n" sin cabecera.
    let section_str =
      toml::to_string(value).map_err(|e| ConfigError::section(section, e))?;

    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::section(section, e))?
      .into_item();

    // 3) Reemplazar solo esa sección; el resto del documento queda intacto.
    doc[section] = section_item;

    atomic_write_str(&self.paths.config_file(), &doc.to_string())?;

    Ok(())
  }
}

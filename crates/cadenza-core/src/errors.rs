// crates/cadenza-core/src/errors.rs
use thiserror::Error;

use crate::ports::CatalogError;

/// Error genérico del núcleo de Cadenza.
///
/// Las capas superiores (API, CLI) mapean este error a un código de
/// respuesta o a un mensaje de usuario.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("repository error: {0}")]
  Repository(String),

  /// El catálogo no tiene artistas de los que elegir una referencia.
  #[error("no artists found")]
  EmptyCatalog,

  #[error("not found")]
  NotFound,

  #[error("invalid query: {0}")]
  InvalidQuery(String),
}

impl From<CatalogError> for CoreError {
  fn from(err: CatalogError) -> Self {
    CoreError::Repository(err.to_string())
  }
}

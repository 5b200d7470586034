use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador opaco de un artista.
///
/// En los datos importados es el id de Spotify, pero el núcleo no asume
/// ningún formato: solo lo compara por igualdad.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
  pub fn new(id: impl Into<String>) -> Self {
    ArtistId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl From<String> for ArtistId {
  fn from(s: String) -> Self {
    ArtistId(s)
  }
}

impl From<&str> for ArtistId {
  fn from(s: &str) -> Self {
    ArtistId(s.to_string())
  }
}

impl From<ArtistId> for String {
  fn from(id: ArtistId) -> Self {
    id.0
  }
}

impl fmt::Display for ArtistId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

use crate::domain::ids::ArtistId;
use serde::{Deserialize, Serialize};

/// Un artista tal como lo guarda el catálogo.
///
/// El núcleo solo lee estos registros; la escritura pertenece al importador
/// y al adapter de almacenamiento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRecord {
  /// Identificador único del artista.
  pub id: ArtistId,

  /// Nombre visible. Nunca vacío en un registro válido.
  pub display_name: String,

  /// Géneros separados por comas, texto libre (`"pop, dance pop"`).
  ///
  /// Puede contener duplicados o el mismo género con distinta capitalización;
  /// ver [`crate::domain::genres::tag_set`].
  pub genre_tags: String,

  /// Popularidad 0..=100, si la fuente la trae.
  pub popularity: Option<u32>,

  pub followers: Option<u64>,
}

impl ArtistRecord {
  pub fn new(id: impl Into<ArtistId>, display_name: impl Into<String>, genre_tags: impl Into<String>) -> Self {
    ArtistRecord {
      id: id.into(),
      display_name: display_name.into(),
      genre_tags: genre_tags.into(),
      popularity: None,
      followers: None,
    }
  }

  /// Primer género de la lista, normalizado. `None` si no tiene géneros.
  pub fn primary_genre(&self) -> Option<String> {
    crate::domain::genres::primary_genre(&self.genre_tags)
  }
}

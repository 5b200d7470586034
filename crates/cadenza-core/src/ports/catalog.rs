use async_trait::async_trait;

use crate::domain::{ArtistId, ArtistPage, ArtistRecord, BrowseQuery, GenreCount};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  #[error("storage error: {0}")]
  Storage(String),

  /// Registro que no se puede convertir en un [`ArtistRecord`] válido.
  #[error("corrupt record {id}: {reason}")]
  Corrupt { id: String, reason: String },
}

/// Port de lectura usado por el motor de similitud.
///
/// Cada método es una única lectura: el motor hace como mucho dos llamadas
/// por consulta (referencia + candidatos) y no cachea nada entre consultas.
#[async_trait]
pub trait ArtistCatalog: Send + Sync {
  /// Todo el catálogo, en orden no especificado.
  async fn fetch_all_artists(&self) -> Result<Vec<ArtistRecord>, CatalogError>;

  /// Artistas cuya lista de géneros contiene `genre` (sin distinguir
  /// mayúsculas), como mucho `limit`. El orden de las filas no está
  /// garantizado y solo sirve para acotar el coste.
  async fn fetch_artists_by_primary_genre(&self, genre: &str, limit: usize) -> Result<Vec<ArtistRecord>, CatalogError>;

  /// Un artista elegido al azar con probabilidad uniforme, o `None` si el
  /// catálogo está vacío.
  async fn fetch_random_artist(&self) -> Result<Option<ArtistRecord>, CatalogError>;
}

/// Port de lectura para los listados del catálogo.
#[async_trait]
pub trait ArtistBrowser: Send + Sync {
  async fn browse(&self, query: &BrowseQuery) -> Result<ArtistPage, CatalogError>;
  async fn find_artist(&self, id: &ArtistId) -> Result<Option<ArtistRecord>, CatalogError>;
  async fn genre_counts(&self) -> Result<Vec<GenreCount>, CatalogError>;
}

use serde::Deserialize;
use thiserror::Error;

use cadenza_core::domain::ArtistRecord;

/// Cabeceras aceptadas para la columna de id.
pub const ID_HEADERS: [&str; 3] = ["id", "spotify_id", "artist_id"];
/// Cabeceras aceptadas para la columna de nombre.
pub const NAME_HEADERS: [&str; 3] = ["name", "artist_name", "artist"];

/// Fila cruda del CSV. Todo llega como texto y se valida después.
#[derive(Debug, Deserialize)]
pub struct CsvArtistRow {
  #[serde(alias = "spotify_id", alias = "artist_id")]
  pub id: Option<String>,

  #[serde(alias = "artist_name", alias = "artist")]
  pub name: Option<String>,

  #[serde(default)]
  pub genres: Option<String>,

  #[serde(default)]
  pub popularity: Option<String>,

  #[serde(default, alias = "total_followers")]
  pub followers: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
  #[error("missing id")]
  MissingId,
  #[error("missing name for {0}")]
  MissingName(String),
}

/// Pasa la columna de géneros a la forma `a,b,c`.
///
/// Acepta tanto la lista separada por comas como el literal de lista de
/// los dumps de Spotify: `['pop', 'dance pop']`.
pub fn normalize_genres(raw: &str) -> String {
  let trimmed = raw.trim();
  let inner = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')).unwrap_or(trimmed);

  inner
    .split(',')
    .map(|tag| tag.trim().trim_matches(|c| c == '\'' || c == '"').trim())
    .filter(|tag| !tag.is_empty())
    .collect::<Vec<_>>()
    .join(",")
}

/// Número tolerante: acepta `"73"` y `"73.0"`. Negativos y basura → `None`.
fn parse_count(raw: Option<&str>) -> Option<f64> {
  let value: f64 = raw?.trim().parse().ok()?;
  (value.is_finite() && value >= 0.0).then_some(value)
}

impl CsvArtistRow {
  pub fn into_record(self) -> Result<ArtistRecord, RowRejection> {
    let id = self.id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).ok_or(RowRejection::MissingId)?;
    let name = match self.name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
      Some(name) => name,
      None => return Err(RowRejection::MissingName(id)),
    };

    let mut record = ArtistRecord::new(id, name, normalize_genres(self.genres.as_deref().unwrap_or("")));
    record.popularity = parse_count(self.popularity.as_deref()).map(|p| p.round().min(100.0) as u32);
    record.followers = parse_count(self.followers.as_deref()).map(|f| f.round() as u64);

    Ok(record)
  }
}

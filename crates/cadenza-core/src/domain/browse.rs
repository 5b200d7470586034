use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::artist::ArtistRecord;

/// Orden de los listados del catálogo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtistOrder {
  /// Alfabético por nombre.
  #[default]
  Name,
  /// Más populares primero; los artistas sin popularidad van al final.
  Popularity,
}

impl fmt::Display for ArtistOrder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ArtistOrder::Name => write!(f, "name"),
      ArtistOrder::Popularity => write!(f, "popularity"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order: {input}")]
pub struct OrderParseError {
  pub input: String,
}

impl FromStr for ArtistOrder {
  type Err = OrderParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "name" => Ok(ArtistOrder::Name),
      "popularity" | "popular" => Ok(ArtistOrder::Popularity),
      _ => Err(OrderParseError { input: s.to_string() }),
    }
  }
}

/// Consulta ya resuelta (límites aplicados) que recibe el adapter de almacenamiento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseQuery {
  /// Filtro por género: contención sin distinguir mayúsculas sobre la lista de géneros.
  pub genre: Option<String>,
  pub min_popularity: Option<u32>,
  pub order: ArtistOrder,
  pub limit: u32,
  pub offset: u32,
}

/// Una página del listado junto con el total de artistas que cumplen el filtro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistPage {
  pub total: u64,
  pub artists: Vec<ArtistRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
  pub genre: String,
  pub artists: u64,
}

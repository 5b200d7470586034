use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ArtistId, ArtistRecord};
use crate::ports::{ArtistCatalog, CatalogError};
use crate::similarity::scoring::{composite_score, genre_similarity, name_similarity_with, EditDistance};

/// Número de coincidencias que devuelve una consulta.
pub const DEFAULT_LIMIT: usize = 10;
/// Máximo de candidatos que la estrategia con poda pide al catálogo.
pub const PRUNED_FETCH_CAP: usize = 500;
/// Umbral de la estrategia con poda, aplicado al género y a la puntuación compuesta.
pub const PRUNED_MIN_SCORE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
  Exhaustive,
  Pruned,
}

impl fmt::Display for StrategyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StrategyKind::Exhaustive => write!(f, "exhaustive"),
      StrategyKind::Pruned => write!(f, "pruned"),
    }
  }
}

/// Candidato puntuado. Vive solo durante una consulta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
  pub id: ArtistId,
  pub display_name: String,
  pub genre_tags: String,
  /// Puntuación compuesta en `[0, 1]`.
  pub similarity_score: f64,
}

impl ScoredCandidate {
  fn from_record(record: &ArtistRecord, similarity_score: f64) -> Self {
    ScoredCandidate {
      id: record.id.clone(),
      display_name: record.display_name.clone(),
      genre_tags: record.genre_tags.clone(),
      similarity_score,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
  /// Como mucho `limit` candidatos, de mayor a menor puntuación.
  pub top_matches: Vec<ScoredCandidate>,
  /// Candidatos distintos de la referencia que entraron en la selección.
  pub candidates_considered: usize,
}

/// Estrategia de selección de candidatos.
///
/// El orquestador no sabe qué variante usa: pide los candidatos con
/// [`fetch_candidates`](CandidateSelector::fetch_candidates) (única lectura
/// del catálogo) y los puntúa con
/// [`select_top_matches`](CandidateSelector::select_top_matches), que es
/// cálculo puro.
#[async_trait]
pub trait CandidateSelector: Send + Sync {
  fn kind(&self) -> StrategyKind;

  async fn fetch_candidates(
    &self,
    catalog: &dyn ArtistCatalog,
    reference: &ArtistRecord,
  ) -> Result<Vec<ArtistRecord>, CatalogError>;

  fn select_top_matches(&self, reference: &ArtistRecord, candidates: &[ArtistRecord], limit: usize) -> Selection;
}

/// Orden descendente estable: los empates conservan el orden de llegada.
fn keep_top(mut scored: Vec<ScoredCandidate>, limit: usize) -> Vec<ScoredCandidate> {
  scored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
  scored.truncate(limit);
  scored
}

/// Estrategia de referencia: puntúa todo el catálogo.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exhaustive;

#[async_trait]
impl CandidateSelector for Exhaustive {
  fn kind(&self) -> StrategyKind {
    StrategyKind::Exhaustive
  }

  async fn fetch_candidates(
    &self,
    catalog: &dyn ArtistCatalog,
    _reference: &ArtistRecord,
  ) -> Result<Vec<ArtistRecord>, CatalogError> {
    catalog.fetch_all_artists().await
  }

  fn select_top_matches(&self, reference: &ArtistRecord, candidates: &[ArtistRecord], limit: usize) -> Selection {
    let scored: Vec<ScoredCandidate> = candidates
      .iter()
      .filter(|c| c.id != reference.id)
      .map(|c| {
        let genre = genre_similarity(&reference.genre_tags, &c.genre_tags);
        let name = name_similarity_with(&reference.display_name, &c.display_name, EditDistance::Matrix);
        ScoredCandidate::from_record(c, composite_score(genre, name))
      })
      .collect();

    let candidates_considered = scored.len();
    Selection { top_matches: keep_top(scored, limit), candidates_considered }
  }
}

/// Estrategia optimizada.
///
/// Es una aproximación, no un equivalente de [`Exhaustive`]: solo mira
/// artistas que comparten el género principal de la referencia (hasta
/// [`PRUNED_FETCH_CAP`]) y descarta los que no llegan a [`PRUNED_MIN_SCORE`].
/// Puede devolver menos de `limit` coincidencias, o ninguna, y puede perder
/// coincidencias que la exhaustiva sí encontraría.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pruned;

#[async_trait]
impl CandidateSelector for Pruned {
  fn kind(&self) -> StrategyKind {
    StrategyKind::Pruned
  }

  async fn fetch_candidates(
    &self,
    catalog: &dyn ArtistCatalog,
    reference: &ArtistRecord,
  ) -> Result<Vec<ArtistRecord>, CatalogError> {
    // Sin géneros toda puntuación de género es 0 y nada pasaría el umbral.
    let Some(genre) = reference.primary_genre() else {
      return Ok(Vec::new());
    };

    let mut fetched = catalog.fetch_artists_by_primary_genre(&genre, PRUNED_FETCH_CAP).await?;
    fetched.truncate(PRUNED_FETCH_CAP);
    Ok(fetched)
  }

  fn select_top_matches(&self, reference: &ArtistRecord, candidates: &[ArtistRecord], limit: usize) -> Selection {
    let mut candidates_considered = 0;
    let mut retained = Vec::new();

    for candidate in candidates.iter().take(PRUNED_FETCH_CAP).filter(|c| c.id != reference.id) {
      candidates_considered += 1;

      let genre = genre_similarity(&reference.genre_tags, &candidate.genre_tags);
      if genre < PRUNED_MIN_SCORE {
        continue;
      }

      let name = name_similarity_with(&reference.display_name, &candidate.display_name, EditDistance::Rolling);
      let score = composite_score(genre, name);
      if score >= PRUNED_MIN_SCORE {
        retained.push(ScoredCandidate::from_record(candidate, score));
      }
    }

    Selection { top_matches: keep_top(retained, limit), candidates_considered }
  }
}

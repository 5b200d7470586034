use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::domain::{ArtistId, ArtistRecord};
use crate::errors::CoreError;
use crate::ports::ArtistCatalog;
use crate::similarity::strategy::DEFAULT_LIMIT;
use crate::similarity::{CandidateSelector, ReferencePicker, ScoredCandidate, StoreRandomPicker, StrategyKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceArtist {
  pub id: ArtistId,
  pub display_name: String,
  pub genre_tags: String,
}

impl From<ArtistRecord> for ReferenceArtist {
  fn from(record: ArtistRecord) -> Self {
    ReferenceArtist { id: record.id, display_name: record.display_name, genre_tags: record.genre_tags }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMetadata {
  pub candidates_considered: usize,
  /// Tiempo de pared de la lectura de candidatos más la puntuación.
  /// Solo informativo.
  pub elapsed_millis: f64,
  pub strategy: StrategyKind,
}

/// Resultado de una consulta de similitud. No se persiste.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityQueryResult {
  pub reference_artist: ReferenceArtist,
  pub top_matches: Vec<ScoredCandidate>,
  pub metadata: QueryMetadata,
}

/// Orquestador de consultas de similitud.
///
/// Cada llamada a [`run`](Self::run) es independiente: elige su propia
/// referencia, lee sus propios candidatos y no guarda nada entre llamadas.
pub struct SimilarityService<C, P = StoreRandomPicker>
where
  C: ArtistCatalog,
  P: ReferencePicker,
{
  catalog: C,
  picker: P,
}

impl<C> SimilarityService<C, StoreRandomPicker>
where
  C: ArtistCatalog,
{
  pub fn new(catalog: C) -> Self {
    Self { catalog, picker: StoreRandomPicker }
  }
}

impl<C, P> SimilarityService<C, P>
where
  C: ArtistCatalog,
  P: ReferencePicker,
{
  pub fn with_picker(catalog: C, picker: P) -> Self {
    Self { catalog, picker }
  }

  /// Ejecuta una consulta completa con la estrategia indicada.
  ///
  /// Falla con [`CoreError::EmptyCatalog`] si no hay artistas.
  pub async fn run(&self, selector: &dyn CandidateSelector) -> Result<SimilarityQueryResult, CoreError> {
    let reference = self.picker.pick(&self.catalog).await?.ok_or(CoreError::EmptyCatalog)?;

    let started = Instant::now();
    let candidates = selector.fetch_candidates(&self.catalog, &reference).await?;
    let selection = selector.select_top_matches(&reference, &candidates, DEFAULT_LIMIT);
    let elapsed_millis = started.elapsed().as_secs_f64() * 1_000.0;

    debug!(
      "similarity query: strategy={} reference={} fetched={} considered={} matches={} elapsed={:.3}ms",
      selector.kind(),
      reference.id,
      candidates.len(),
      selection.candidates_considered,
      selection.top_matches.len(),
      elapsed_millis,
    );

    Ok(SimilarityQueryResult {
      reference_artist: ReferenceArtist::from(reference),
      top_matches: selection.top_matches,
      metadata: QueryMetadata {
        candidates_considered: selection.candidates_considered,
        elapsed_millis,
        strategy: selector.kind(),
      },
    })
  }
}

use async_trait::async_trait;

use crate::domain::ArtistRecord;
use crate::ports::CatalogError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
  pub inserted: usize,
  pub updated: usize,
}

impl UpsertOutcome {
  pub fn merge(&mut self, other: UpsertOutcome) {
    self.inserted += other.inserted;
    self.updated += other.updated;
  }
}

/// Port de escritura usado por el importador.
///
/// Un lote se aplica entero o no se aplica: los adapters lo ejecutan en una
/// sola transacción. Los registros se identifican por `id`; si ya existe se
/// actualiza.
#[async_trait]
pub trait ArtistWriter: Send + Sync {
  async fn upsert_artists(&self, batch: &[ArtistRecord]) -> Result<UpsertOutcome, CatalogError>;
}

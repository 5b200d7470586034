use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::ArtistRecord;
use crate::ports::{ArtistCatalog, CatalogError};

/// Elige el artista de referencia de una consulta.
///
/// Devuelve `None` solo cuando el catálogo está vacío.
#[async_trait]
pub trait ReferencePicker: Send + Sync {
  async fn pick(&self, catalog: &dyn ArtistCatalog) -> Result<Option<ArtistRecord>, CatalogError>;
}

/// Delega en el catálogo (`ORDER BY RANDOM()` en SQLite).
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreRandomPicker;

#[async_trait]
impl ReferencePicker for StoreRandomPicker {
  async fn pick(&self, catalog: &dyn ArtistCatalog) -> Result<Option<ArtistRecord>, CatalogError> {
    catalog.fetch_random_artist().await
  }
}

type ChooseFn = dyn Fn(usize) -> usize + Send + Sync;

/// Carga el catálogo y elige por índice con una función inyectada.
///
/// La función recibe el tamaño del catálogo (siempre > 0) y devuelve un
/// índice; los valores fuera de rango se reducen módulo el tamaño.
pub struct IndexPicker {
  choose: Box<ChooseFn>,
}

impl IndexPicker {
  pub fn new<F>(choose: F) -> Self
  where
    F: Fn(usize) -> usize + Send + Sync + 'static,
  {
    Self { choose: Box::new(choose) }
  }

  /// Elección uniforme y reproducible: cada consulta usa un generador nuevo
  /// con la misma semilla, así que no hay estado compartido entre consultas.
  pub fn seeded(seed: u64) -> Self {
    Self::new(move |len| StdRng::seed_from_u64(seed).gen_range(0..len))
  }
}

impl std::fmt::Debug for IndexPicker {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("IndexPicker").finish_non_exhaustive()
  }
}

#[async_trait]
impl ReferencePicker for IndexPicker {
  async fn pick(&self, catalog: &dyn ArtistCatalog) -> Result<Option<ArtistRecord>, CatalogError> {
    let mut artists = catalog.fetch_all_artists().await?;
    if artists.is_empty() {
      return Ok(None);
    }

    let index = (self.choose)(artists.len()) % artists.len();
    Ok(Some(artists.swap_remove(index)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ports::InMemoryCatalog;

  fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new((0..5).map(|i| ArtistRecord::new(format!("{i}"), format!("A{i}"), "pop")).collect())
  }

  #[tokio::test]
  async fn index_picker_uses_the_injected_choice() {
    let picked = IndexPicker::new(|_| 3).pick(&catalog()).await.unwrap().unwrap();
    assert_eq!(picked.id.as_str(), "3");

    let wrapped = IndexPicker::new(|len| len + 1).pick(&catalog()).await.unwrap().unwrap();
    assert_eq!(wrapped.id.as_str(), "1");
  }

  #[tokio::test]
  async fn seeded_picker_is_reproducible() {
    let picker = IndexPicker::seeded(7);
    let first = picker.pick(&catalog()).await.unwrap();
    let second = picker.pick(&catalog()).await.unwrap();
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn pickers_return_none_on_empty_catalog() {
    let empty = InMemoryCatalog::default();
    assert!(StoreRandomPicker.pick(&empty).await.unwrap().is_none());
    assert!(IndexPicker::seeded(1).pick(&empty).await.unwrap().is_none());
  }
}

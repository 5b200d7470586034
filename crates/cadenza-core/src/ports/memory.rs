use std::sync::{Arc, RwLock, RwLockReadGuard};

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::domain::{genres, ArtistId, ArtistOrder, ArtistPage, ArtistRecord, BrowseQuery, GenreCount};
use crate::ports::{ArtistBrowser, ArtistCatalog, ArtistWriter, CatalogError, UpsertOutcome};

/// Catálogo en memoria con la misma semántica que el adapter SQLite.
///
/// Sirve para tests y para ejecutar el motor sin base de datos. Los clones
/// comparten los mismos datos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
  artists: Arc<RwLock<Vec<ArtistRecord>>>,
}

impl InMemoryCatalog {
  pub fn new(artists: Vec<ArtistRecord>) -> Self {
    Self { artists: Arc::new(RwLock::new(artists)) }
  }

  fn read(&self) -> Result<RwLockReadGuard<'_, Vec<ArtistRecord>>, CatalogError> {
    self.artists.read().map_err(|_| CatalogError::Storage("catalog lock poisoned".to_string()))
  }

  pub fn len(&self) -> Result<usize, CatalogError> {
    Ok(self.read()?.len())
  }

  pub fn is_empty(&self) -> Result<bool, CatalogError> {
    Ok(self.read()?.is_empty())
  }
}

fn genre_matches(record: &ArtistRecord, genre: &str) -> bool {
  record.genre_tags.to_lowercase().contains(&genre.to_lowercase())
}

#[async_trait]
impl ArtistCatalog for InMemoryCatalog {
  async fn fetch_all_artists(&self) -> Result<Vec<ArtistRecord>, CatalogError> {
    Ok(self.read()?.clone())
  }

  async fn fetch_artists_by_primary_genre(&self, genre: &str, limit: usize) -> Result<Vec<ArtistRecord>, CatalogError> {
    let artists = self.read()?;
    Ok(artists.iter().filter(|a| genre_matches(a, genre)).take(limit).cloned().collect())
  }

  async fn fetch_random_artist(&self) -> Result<Option<ArtistRecord>, CatalogError> {
    let artists = self.read()?;
    Ok(artists.choose(&mut rand::thread_rng()).cloned())
  }
}

#[async_trait]
impl ArtistBrowser for InMemoryCatalog {
  async fn browse(&self, query: &BrowseQuery) -> Result<ArtistPage, CatalogError> {
    let artists = self.read()?;

    let mut matching: Vec<&ArtistRecord> = artists
      .iter()
      .filter(|a| query.genre.as_deref().is_none_or(|g| genre_matches(a, g)))
      .filter(|a| query.min_popularity.is_none_or(|min| a.popularity.is_some_and(|p| p >= min)))
      .collect();

    match query.order {
      ArtistOrder::Name => matching.sort_by(|a, b| a.display_name.cmp(&b.display_name).then_with(|| a.id.cmp(&b.id))),
      ArtistOrder::Popularity => matching.sort_by(|a, b| {
        b.popularity.cmp(&a.popularity).then_with(|| a.display_name.cmp(&b.display_name))
      }),
    }

    let total = matching.len() as u64;
    let artists =
      matching.into_iter().skip(query.offset as usize).take(query.limit as usize).cloned().collect();

    Ok(ArtistPage { total, artists })
  }

  async fn find_artist(&self, id: &ArtistId) -> Result<Option<ArtistRecord>, CatalogError> {
    Ok(self.read()?.iter().find(|a| &a.id == id).cloned())
  }

  async fn genre_counts(&self) -> Result<Vec<GenreCount>, CatalogError> {
    let artists = self.read()?;
    Ok(genres::tally(artists.iter().map(|a| a.genre_tags.as_str())))
  }
}

#[async_trait]
impl ArtistWriter for InMemoryCatalog {
  async fn upsert_artists(&self, batch: &[ArtistRecord]) -> Result<UpsertOutcome, CatalogError> {
    let mut artists =
      self.artists.write().map_err(|_| CatalogError::Storage("catalog lock poisoned".to_string()))?;
    let mut outcome = UpsertOutcome::default();

    for record in batch {
      match artists.iter_mut().find(|a| a.id == record.id) {
        Some(existing) => {
          // Igual que el adapter SQLite: `None` no pisa lo guardado.
          let popularity = record.popularity.or(existing.popularity);
          let followers = record.followers.or(existing.followers);
          *existing = ArtistRecord { popularity, followers, ..record.clone() };
          outcome.updated += 1;
        }
        None => {
          artists.push(record.clone());
          outcome.inserted += 1;
        }
      }
    }

    Ok(outcome)
  }
}

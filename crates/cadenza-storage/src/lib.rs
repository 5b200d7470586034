pub mod config;
pub mod models;
pub mod pool;
pub mod schema;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::{Sqlite, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, info};
use thiserror::Error;
use tokio::task;

use cadenza_core::domain::{ArtistId, ArtistOrder, ArtistPage, ArtistRecord, BrowseQuery, GenreCount, genres};
use cadenza_core::ports::{ArtistBrowser, ArtistCatalog, ArtistWriter, CatalogError, UpsertOutcome};

use crate::config::StorageConfig;
use crate::models::{ArtistRow, NewArtistRow};
use crate::pool::{ConnectionOptions, SqlitePool};
use crate::schema::artists;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const BUSY_TIMEOUT_MS: u32 = 5_000;

diesel::define_sql_function! {
  /// `RANDOM()` de SQLite.
  fn random() -> Integer;
}

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("config error: {0}")]
  Config(#[from] cadenza_config::ConfigError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("pool error: {0}")]
  Pool(#[from] diesel::r2d2::PoolError),

  #[error("migration error: {0}")]
  Migration(String),
}

/// Adapter SQLite del catálogo de artistas.
///
/// Diesel es síncrono: cada operación saca una conexión del pool dentro de
/// `spawn_blocking`. Los clones comparten el mismo pool.
#[derive(Clone)]
pub struct ArtistStore {
  pool: SqlitePool,
}

impl ArtistStore {
  /// Abre (o crea) la base de datos y aplica las migraciones pendientes.
  pub fn open(cfg: &StorageConfig) -> Result<Self, StorageError> {
    if let Some(parent) = cfg.db_path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let database_url = cfg.db_path.to_string_lossy().to_string();
    let options = ConnectionOptions { journal_mode: cfg.journal_mode.clone(), busy_timeout_ms: BUSY_TIMEOUT_MS };

    let pool = Pool::builder()
      .max_size(cfg.pool_size.max(1))
      .connection_customizer(Box::new(options))
      .build(ConnectionManager::<SqliteConnection>::new(database_url))?;

    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| StorageError::Migration(e.to_string()))?;
    if !applied.is_empty() {
      info!("applied {} migration(s) to {}", applied.len(), cfg.db_path.display());
    }

    Ok(Self { pool })
  }

  pub fn new_from_config() -> Result<Self, StorageError> {
    let cfg = StorageConfig::load()?;
    Self::open(&cfg)
  }

  /// Ejecuta `op` con una conexión del pool fuera del runtime async.
  async fn with_conn<T, F>(&self, op: F) -> Result<T, CatalogError>
  where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T, CatalogError> + Send + 'static,
  {
    let pool = self.pool.clone();

    task::spawn_blocking(move || {
      let mut conn = pool.get().map_err(|e| CatalogError::Storage(e.to_string()))?;
      op(&mut conn)
    })
    .await
    .map_err(|e| CatalogError::Storage(format!("join error: {e}")))?
  }
}

fn query_err(e: diesel::result::Error) -> CatalogError {
  CatalogError::Storage(e.to_string())
}

fn record_to_new_row(record: &ArtistRecord) -> NewArtistRow {
  NewArtistRow {
    id: record.id.to_string(),
    name: record.display_name.clone(),
    genres: record.genre_tags.clone(),
    genres_folded: record.genre_tags.to_lowercase(),
    popularity: record.popularity.map(|p| p.min(i32::MAX as u32) as i32),
    followers: record.followers.map(|f| f.min(i64::MAX as u64) as i64),
  }
}

/// Una fila sin nombre es un registro corrupto: se corta la consulta en vez
/// de puntuar datos a medias.
fn row_to_record(row: ArtistRow) -> Result<ArtistRecord, CatalogError> {
  if row.name.trim().is_empty() {
    return Err(CatalogError::Corrupt { id: row.id, reason: "empty name".to_string() });
  }

  Ok(ArtistRecord {
    id: ArtistId::from(row.id),
    display_name: row.name,
    genre_tags: row.genres,
    popularity: row.popularity.and_then(|p| u32::try_from(p).ok()),
    followers: row.followers.and_then(|f| u64::try_from(f).ok()),
  })
}

fn rows_to_records(rows: Vec<ArtistRow>) -> Result<Vec<ArtistRecord>, CatalogError> {
  rows.into_iter().map(row_to_record).collect()
}

/// Patrón `LIKE` de contención sin distinguir mayúsculas sobre `genres_folded`.
///
/// El plegado se hace en Rust (el `LIKE` de SQLite solo entiende ASCII) y
/// los comodines de la entrada se escapan con `\`.
fn genre_pattern(genre: &str) -> String {
  let mut pattern = String::with_capacity(genre.len() + 2);
  pattern.push('%');
  for c in genre.to_lowercase().chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

/// Filtros comunes al conteo y a la página del listado.
fn filtered(query: &BrowseQuery) -> artists::BoxedQuery<'static, Sqlite> {
  let mut q = artists::table.into_boxed();

  if let Some(genre) = &query.genre {
    q = q.filter(artists::genres_folded.like(genre_pattern(genre)).escape('\\'));
  }
  if let Some(min) = query.min_popularity {
    q = q.filter(artists::popularity.ge(min as i32));
  }

  q
}

#[async_trait]
impl ArtistCatalog for ArtistStore {
  async fn fetch_all_artists(&self) -> Result<Vec<ArtistRecord>, CatalogError> {
    self
      .with_conn(|conn| {
        let rows = artists::table.select(ArtistRow::as_select()).load(conn).map_err(query_err)?;
        rows_to_records(rows)
      })
      .await
  }

  async fn fetch_artists_by_primary_genre(&self, genre: &str, limit: usize) -> Result<Vec<ArtistRecord>, CatalogError> {
    let pattern = genre_pattern(genre);
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    self
      .with_conn(move |conn| {
        let rows = artists::table
          .filter(artists::genres_folded.like(pattern).escape('\\'))
          .limit(limit)
          .select(ArtistRow::as_select())
          .load(conn)
          .map_err(query_err)?;
        debug!("primary genre fetch returned {} row(s)", rows.len());
        rows_to_records(rows)
      })
      .await
  }

  async fn fetch_random_artist(&self) -> Result<Option<ArtistRecord>, CatalogError> {
    self
      .with_conn(|conn| {
        let row = artists::table
          .order(random())
          .select(ArtistRow::as_select())
          .first(conn)
          .optional()
          .map_err(query_err)?;
        row.map(row_to_record).transpose()
      })
      .await
  }
}

#[async_trait]
impl ArtistBrowser for ArtistStore {
  async fn browse(&self, query: &BrowseQuery) -> Result<ArtistPage, CatalogError> {
    let query = query.clone();

    self
      .with_conn(move |conn| {
        let total: i64 = filtered(&query).count().get_result(conn).map_err(query_err)?;

        let page = filtered(&query).select(ArtistRow::as_select()).limit(query.limit as i64).offset(query.offset as i64);
        let rows = match query.order {
          ArtistOrder::Name => page.order((artists::name.asc(), artists::id.asc())).load(conn),
          ArtistOrder::Popularity => page.order((artists::popularity.desc(), artists::name.asc())).load(conn),
        }
        .map_err(query_err)?;

        Ok(ArtistPage { total: total.max(0) as u64, artists: rows_to_records(rows)? })
      })
      .await
  }

  async fn find_artist(&self, id: &ArtistId) -> Result<Option<ArtistRecord>, CatalogError> {
    let id = id.to_string();

    self
      .with_conn(move |conn| {
        let row = artists::table
          .find(id)
          .select(ArtistRow::as_select())
          .first(conn)
          .optional()
          .map_err(query_err)?;
        row.map(row_to_record).transpose()
      })
      .await
  }

  async fn genre_counts(&self) -> Result<Vec<GenreCount>, CatalogError> {
    self
      .with_conn(|conn| {
        let lists: Vec<String> = artists::table.select(artists::genres).load(conn).map_err(query_err)?;
        Ok(genres::tally(lists.iter().map(String::as_str)))
      })
      .await
  }
}

#[async_trait]
impl ArtistWriter for ArtistStore {
  async fn upsert_artists(&self, batch: &[ArtistRecord]) -> Result<UpsertOutcome, CatalogError> {
    let rows: Vec<NewArtistRow> = batch.iter().map(record_to_new_row).collect();

    self
      .with_conn(move |conn| {
        conn
          .transaction::<_, diesel::result::Error, _>(|conn| {
            let mut outcome = UpsertOutcome::default();

            for row in &rows {
              let exists: bool = diesel::select(diesel::dsl::exists(artists::table.find(&row.id))).get_result(conn)?;

              diesel::insert_into(artists::table)
                .values(row)
                .on_conflict(artists::id)
                .do_update()
                .set(row)
                .execute(conn)?;

              if exists {
                outcome.updated += 1;
              } else {
                outcome.inserted += 1;
              }
            }

            Ok(outcome)
          })
          .map_err(query_err)
      })
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cadenza_core::similarity::{CandidateSelector, Exhaustive, IndexPicker, Pruned};
  use cadenza_core::services::SimilarityService;
  use tempfile::TempDir;

  fn open_store() -> (TempDir, ArtistStore) {
    let tmp = tempfile::tempdir().unwrap();
    let store = ArtistStore::open(&StorageConfig::at(tmp.path().join("db").join("cadenza.db"))).unwrap();
    (tmp, store)
  }

  fn artist(id: &str, name: &str, genres: &str, popularity: Option<u32>) -> ArtistRecord {
    let mut record = ArtistRecord::new(id, name, genres);
    record.popularity = popularity;
    record
  }

  async fn seeded_store() -> (TempDir, ArtistStore) {
    let (tmp, store) = open_store();
    let batch = vec![
      artist("1", "Artist One", "pop,rock", Some(50)),
      artist("2", "Artist Two", "pop,electronic", Some(80)),
      artist("3", "Artist Three", "pop,rock", None),
      artist("4", "Quartet", "Jazz", Some(20)),
    ];
    store.upsert_artists(&batch).await.unwrap();
    (tmp, store)
  }

  #[tokio::test]
  async fn upsert_inserts_then_updates() {
    let (_tmp, store) = open_store();

    let first = store.upsert_artists(&[artist("a", "A", "pop", Some(10))]).await.unwrap();
    assert_eq!(first, UpsertOutcome { inserted: 1, updated: 0 });

    let second =
      store.upsert_artists(&[artist("a", "A renamed", "pop,rock", None), artist("b", "B", "", None)]).await.unwrap();
    assert_eq!(second, UpsertOutcome { inserted: 1, updated: 1 });

    let a = store.find_artist(&ArtistId::from("a")).await.unwrap().unwrap();
    assert_eq!(a.display_name, "A renamed");
    assert_eq!(a.genre_tags, "pop,rock");
    // `None` no pisa la popularidad guardada.
    assert_eq!(a.popularity, Some(10));
  }

  #[tokio::test]
  async fn catalog_reads() {
    let (_tmp, store) = seeded_store().await;

    assert_eq!(store.fetch_all_artists().await.unwrap().len(), 4);

    let pop = store.fetch_artists_by_primary_genre("POP", 500).await.unwrap();
    assert_eq!(pop.len(), 3);
    let capped = store.fetch_artists_by_primary_genre("pop", 2).await.unwrap();
    assert_eq!(capped.len(), 2);

    let random = store.fetch_random_artist().await.unwrap().unwrap();
    assert!(["1", "2", "3", "4"].contains(&random.id.as_str()));
  }

  #[tokio::test]
  async fn empty_store_has_no_random_artist() {
    let (_tmp, store) = open_store();
    assert!(store.fetch_random_artist().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn browse_filters_orders_and_counts() {
    let (_tmp, store) = seeded_store().await;

    let query = BrowseQuery { genre: Some("pop".into()), min_popularity: None, order: ArtistOrder::Popularity, limit: 2, offset: 0 };
    let page = store.browse(&query).await.unwrap();
    assert_eq!(page.total, 3);
    let ids: Vec<&str> = page.artists.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);

    let query = BrowseQuery { genre: None, min_popularity: Some(30), order: ArtistOrder::Name, limit: 10, offset: 0 };
    let page = store.browse(&query).await.unwrap();
    let names: Vec<&str> = page.artists.iter().map(|a| a.display_name.as_str()).collect();
    assert_eq!(names, vec!["Artist One", "Artist Two"]);
  }

  #[tokio::test]
  async fn genre_counts_are_tallied() {
    let (_tmp, store) = seeded_store().await;
    let counts = store.genre_counts().await.unwrap();
    assert_eq!(counts[0], GenreCount { genre: "pop".into(), artists: 3 });
    assert_eq!(counts.iter().find(|c| c.genre == "jazz").unwrap().artists, 1);
  }

  #[tokio::test]
  async fn similarity_runs_against_sqlite() {
    let (_tmp, store) = seeded_store().await;
    let service = SimilarityService::with_picker(store.clone(), IndexPicker::new(|_| 0));

    let exhaustive = service.run(&Exhaustive).await.unwrap();
    assert_eq!(exhaustive.metadata.candidates_considered, 3);
    assert!(exhaustive.top_matches.iter().all(|m| m.id != exhaustive.reference_artist.id));

    let pruned = service.run(&Pruned).await.unwrap();
    assert!(pruned.top_matches.len() <= pruned.metadata.candidates_considered);
  }

  #[tokio::test]
  async fn genre_match_folds_non_ascii_case() {
    let (_tmp, store) = open_store();
    let batch = vec![
      artist("e1", "Daft Punk", "Électro,house", None),
      artist("e2", "Justice", "ÉLECTRO,house", None),
      artist("e3", "Kavinsky", "électro", None),
      artist("x", "Other", "rock", None),
    ];
    store.upsert_artists(&batch).await.unwrap();

    let reference = store.find_artist(&ArtistId::from("e1")).await.unwrap().unwrap();
    let fetched = Pruned.fetch_candidates(&store, &reference).await.unwrap();
    let mut ids: Vec<&str> = fetched.iter().map(|a| a.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["e1", "e2", "e3"]);

    // Mismo resultado que el catálogo en memoria.
    let memory = cadenza_core::ports::InMemoryCatalog::new(batch);
    assert_eq!(Pruned.fetch_candidates(&memory, &reference).await.unwrap().len(), 3);

    let query = BrowseQuery { genre: Some("ÉLECTRO".into()), min_popularity: None, order: ArtistOrder::Name, limit: 10, offset: 0 };
    assert_eq!(store.browse(&query).await.unwrap().total, 3);
  }

  #[tokio::test]
  async fn genre_wildcards_are_literal() {
    let (_tmp, store) = open_store();
    let batch = vec![
      artist("1", "Spaced", "hip hop", None),
      artist("2", "Underscored", "hip_hop", None),
      artist("3", "Percent", "100% pop", None),
      artist("4", "Slashed", "drum\\bass", None),
    ];
    store.upsert_artists(&batch).await.unwrap();

    let ids = |rows: Vec<ArtistRecord>| rows.into_iter().map(|a| a.id.into_inner()).collect::<Vec<_>>();
    assert_eq!(ids(store.fetch_artists_by_primary_genre("hip_hop", 500).await.unwrap()), vec!["2"]);
    assert_eq!(ids(store.fetch_artists_by_primary_genre("100%", 500).await.unwrap()), vec!["3"]);
    assert!(store.fetch_artists_by_primary_genre("%", 500).await.unwrap().len() == 1);
    assert_eq!(ids(store.fetch_artists_by_primary_genre("drum\\bass", 500).await.unwrap()), vec!["4"]);
  }

  #[test]
  fn genre_pattern_escapes_like_wildcards() {
    assert_eq!(genre_pattern("Hip_Hop"), "%hip\\_hop%");
    assert_eq!(genre_pattern("100%"), "%100\\%%");
    assert_eq!(genre_pattern("a\\b"), "%a\\\\b%");
    assert_eq!(genre_pattern("ÉLECTRO"), "%électro%");
  }
}

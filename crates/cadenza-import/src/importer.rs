use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use thiserror::Error;

use cadenza_core::domain::ArtistRecord;
use cadenza_core::ports::ArtistWriter;

use crate::config::ImportConfig;
use crate::row::{CsvArtistRow, ID_HEADERS, NAME_HEADERS};

#[derive(Debug, Error)]
pub enum ImportError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("missing required column `{0}`")]
  MissingColumn(&'static str),

  #[error("delimiter must be a single ASCII character, got {0:?}")]
  Delimiter(char),

  #[error("writer error: {0}")]
  Writer(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
  /// Filas de datos leídas (sin contar la cabecera).
  pub read: usize,
  pub inserted: usize,
  pub updated: usize,
  /// Filas ilegibles o sin id/nombre.
  pub skipped: usize,
}

impl fmt::Display for ImportReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "read {}, inserted {}, updated {}, skipped {}", self.read, self.inserted, self.updated, self.skipped)
  }
}

/// Importa artistas desde CSV hacia cualquier [`ArtistWriter`].
///
/// Las filas se escriben en lotes de `batch_size`; cada lote es una
/// transacción. Si un lote falla, la importación se detiene y los lotes
/// anteriores quedan escritos.
pub struct CsvImporter<W>
where
  W: ArtistWriter,
{
  writer: W,
  cfg: ImportConfig,
}

fn require_column(headers: &StringRecord, accepted: &[&str], name: &'static str) -> Result<(), ImportError> {
  if headers.iter().any(|h| accepted.contains(&h)) { Ok(()) } else { Err(ImportError::MissingColumn(name)) }
}

impl<W> CsvImporter<W>
where
  W: ArtistWriter,
{
  pub fn new(writer: W, cfg: ImportConfig) -> Self {
    Self { writer, cfg }
  }

  pub async fn import_path(&self, path: &Path) -> Result<ImportReport, ImportError> {
    info!("importing artists from {}", path.display());
    let file = File::open(path)?;
    self.import_reader(file).await
  }

  pub async fn import_reader<R: Read>(&self, reader: R) -> Result<ImportReport, ImportError> {
    let delimiter =
      u8::try_from(self.cfg.delimiter).ok().filter(u8::is_ascii).ok_or(ImportError::Delimiter(self.cfg.delimiter))?;
    let batch_size = self.cfg.batch_size.max(1);

    let mut rdr = ReaderBuilder::new().delimiter(delimiter).trim(Trim::All).flexible(true).from_reader(reader);

    // Cabeceras en minúsculas y sin BOM para que los alias de serde coincidan.
    let headers: StringRecord =
      rdr.headers()?.iter().map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase()).collect();
    require_column(&headers, &ID_HEADERS, "id")?;
    require_column(&headers, &NAME_HEADERS, "name")?;
    rdr.set_headers(headers);

    let mut report = ImportReport::default();
    let mut batch: Vec<ArtistRecord> = Vec::with_capacity(batch_size);

    for (index, result) in rdr.deserialize::<CsvArtistRow>().enumerate() {
      report.read += 1;
      // +2: la cabecera es la línea 1.
      let line = index + 2;

      let row = match result {
        Ok(row) => row,
        Err(e) => {
          warn!("line {line}: skipping unreadable row: {e}");
          report.skipped += 1;
          continue;
        }
      };

      match row.into_record() {
        Ok(record) => batch.push(record),
        Err(rejection) => {
          warn!("line {line}: skipping row: {rejection}");
          report.skipped += 1;
          continue;
        }
      }

      if batch.len() >= batch_size {
        self.flush(&mut batch, &mut report).await?;
      }
    }

    self.flush(&mut batch, &mut report).await?;

    info!("import finished: {report}");
    Ok(report)
  }

  async fn flush(&self, batch: &mut Vec<ArtistRecord>, report: &mut ImportReport) -> Result<(), ImportError> {
    if batch.is_empty() {
      return Ok(());
    }

    let outcome = self.writer.upsert_artists(batch).await.map_err(|e| ImportError::Writer(e.to_string()))?;
    report.inserted += outcome.inserted;
    report.updated += outcome.updated;
    info!("batch of {} written ({} new, {} updated)", batch.len(), outcome.inserted, outcome.updated);

    batch.clear();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cadenza_core::domain::ArtistId;
  use cadenza_core::ports::{ArtistBrowser, InMemoryCatalog};

  const SPOTIFY_DUMP: &str = "\
id,name,genres,popularity,followers
4gzpq5DPGxSnKTe4SA8HAU,Coldplay,\"['permanent wave', 'pop']\",86,39000000.0
3TVXtAsR1Inumwj472S9r4,Drake,\"['canadian hip hop', 'hip hop', 'rap']\",95,
,No Id,pop,10,1
1uNFoZAHBGtllmzznpCI3s,,pop,10,1
06HL4z0CvFAxyc27GXpf02,Taylor Swift,\"['pop']\",100,
";

  fn importer(catalog: InMemoryCatalog, batch_size: usize) -> CsvImporter<InMemoryCatalog> {
    CsvImporter::new(catalog, ImportConfig { batch_size, delimiter: ',' })
  }

  #[tokio::test]
  async fn imports_valid_rows_and_skips_the_rest() {
    let catalog = InMemoryCatalog::default();
    let report = importer(catalog.clone(), 2).import_reader(SPOTIFY_DUMP.as_bytes()).await.unwrap();

    assert_eq!(report, ImportReport { read: 5, inserted: 3, updated: 0, skipped: 2 });
    assert_eq!(catalog.len().unwrap(), 3);

    let coldplay = catalog.find_artist(&ArtistId::from("4gzpq5DPGxSnKTe4SA8HAU")).await.unwrap().unwrap();
    assert_eq!(coldplay.genre_tags, "permanent wave,pop");
    assert_eq!(coldplay.popularity, Some(86));
    assert_eq!(coldplay.followers, Some(39_000_000));
  }

  #[tokio::test]
  async fn reimport_updates_existing_rows() {
    let catalog = InMemoryCatalog::default();
    let imp = importer(catalog.clone(), 500);
    imp.import_reader(SPOTIFY_DUMP.as_bytes()).await.unwrap();
    let report = imp.import_reader(SPOTIFY_DUMP.as_bytes()).await.unwrap();

    assert_eq!(report.inserted, 0);
    assert_eq!(report.updated, 3);
    assert_eq!(catalog.len().unwrap(), 3);
  }

  #[tokio::test]
  async fn header_aliases_and_other_delimiters() {
    let csv = "\u{feff}Spotify_ID;Artist_Name;Genres\nabc;Björk;art pop, icelandic\n";
    let catalog = InMemoryCatalog::default();
    let imp = CsvImporter::new(catalog.clone(), ImportConfig { batch_size: 10, delimiter: ';' });

    let report = imp.import_reader(csv.as_bytes()).await.unwrap();
    assert_eq!(report.inserted, 1);
    let bjork = catalog.find_artist(&ArtistId::from("abc")).await.unwrap().unwrap();
    assert_eq!(bjork.display_name, "Björk");
    assert_eq!(bjork.genre_tags, "art pop,icelandic");
  }

  #[tokio::test]
  async fn missing_name_column_is_an_error() {
    let err = importer(InMemoryCatalog::default(), 10).import_reader("id,genres\nx,pop\n".as_bytes()).await.unwrap_err();
    assert!(matches!(err, ImportError::MissingColumn("name")));
  }

  #[tokio::test]
  async fn non_ascii_delimiter_is_rejected() {
    let imp = CsvImporter::new(InMemoryCatalog::default(), ImportConfig { batch_size: 10, delimiter: '€' });
    let err = imp.import_reader("id,name\n".as_bytes()).await.unwrap_err();
    assert!(matches!(err, ImportError::Delimiter('€')));
  }
}

use crate::domain::{ArtistId, ArtistOrder, ArtistPage, ArtistRecord, BrowseQuery, GenreCount};
use crate::errors::CoreError;
use crate::ports::ArtistBrowser;

/// Popularidad máxima que publica la fuente de datos.
const MAX_POPULARITY: u32 = 100;

/// Límites de página aplicados a los listados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseLimits {
  pub default_limit: u32,
  pub max_limit: u32,
}

impl Default for BrowseLimits {
  fn default() -> Self {
    BrowseLimits { default_limit: 50, max_limit: 200 }
  }
}

/// Parámetros de listado tal como llegan de fuera, todos opcionales.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseRequest {
  pub genre: Option<String>,
  pub min_popularity: Option<u32>,
  pub order: ArtistOrder,
  pub limit: Option<u32>,
  pub offset: Option<u32>,
}

pub struct CatalogService<B>
where
  B: ArtistBrowser,
{
  browser: B,
  limits: BrowseLimits,
}

impl<B> CatalogService<B>
where
  B: ArtistBrowser,
{
  pub fn new(browser: B, limits: BrowseLimits) -> Self {
    Self { browser, limits }
  }

  /// Resuelve los parámetros opcionales en una [`BrowseQuery`].
  ///
  /// - género vacío o en blanco → sin filtro;
  /// - sin `limit` → `default_limit`; por encima de `max_limit` se recorta;
  /// - `limit = 0` o popularidad > 100 → [`CoreError::InvalidQuery`].
  pub fn resolve(&self, request: BrowseRequest) -> Result<BrowseQuery, CoreError> {
    let genre = request.genre.map(|g| g.trim().to_string()).filter(|g| !g.is_empty());

    if let Some(min) = request.min_popularity {
      if min > MAX_POPULARITY {
        return Err(CoreError::InvalidQuery(format!("min_popularity must be at most {MAX_POPULARITY}, got {min}")));
      }
    }

    let limit = match request.limit {
      None => self.limits.default_limit,
      Some(0) => return Err(CoreError::InvalidQuery("limit must be greater than zero".to_string())),
      Some(n) => n.min(self.limits.max_limit),
    };

    Ok(BrowseQuery {
      genre,
      min_popularity: request.min_popularity,
      order: request.order,
      limit,
      offset: request.offset.unwrap_or(0),
    })
  }

  // -------- QUERY (read) --------

  pub async fn browse(&self, request: BrowseRequest) -> Result<ArtistPage, CoreError> {
    let query = self.resolve(request)?;
    Ok(self.browser.browse(&query).await?)
  }

  pub async fn get_artist(&self, id: &ArtistId) -> Result<ArtistRecord, CoreError> {
    self.browser.find_artist(id).await?.ok_or(CoreError::NotFound)
  }

  pub async fn genres(&self) -> Result<Vec<GenreCount>, CoreError> {
    Ok(self.browser.genre_counts().await?)
  }
}

//! Request boundary: maps `GET` requests onto the core services and renders
//! JSON responses.
//!
//! The boundary is transport-agnostic. It takes an [`http::Request`] and
//! returns an [`http::Response`]; the CLI feeds it directly and any HTTP
//! listener can do the same.

use cadenza_core::domain::ArtistId;
use cadenza_core::ports::{ArtistBrowser, ArtistCatalog};
use cadenza_core::services::{BrowseLimits, BrowseRequest, CatalogService, SimilarityService};
use cadenza_core::similarity::{CandidateSelector, Exhaustive, Pruned, ReferencePicker, StoreRandomPicker};
use cadenza_core::CoreError;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use log::{debug, error};
use serde::Serialize;

use crate::dto::{ArtistDto, ArtistPageDto, ErrorDto, GenresDto, SimilarityResponseDto};

const NO_ARTISTS: &str = "No artists found";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),
  #[error("{0}")]
  BadRequest(String),
  #[error("method not allowed")]
  MethodNotAllowed,
  /// The detail goes to the log only, never to the client.
  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn public_message(&self) -> String {
    match self {
      ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg.clone(),
      ApiError::MethodNotAllowed => "Method not allowed".to_string(),
      ApiError::Internal(_) => "Internal server error".to_string(),
    }
  }
}

impl From<CoreError> for ApiError {
  fn from(err: CoreError) -> Self {
    match err {
      CoreError::EmptyCatalog => ApiError::NotFound(NO_ARTISTS.to_string()),
      CoreError::NotFound => ApiError::NotFound("Not found".to_string()),
      CoreError::InvalidQuery(msg) => ApiError::BadRequest(msg),
      CoreError::Repository(msg) => ApiError::Internal(msg),
    }
  }
}

pub struct Api<S, P = StoreRandomPicker>
where
  S: ArtistCatalog + ArtistBrowser + Clone,
  P: ReferencePicker,
{
  similarity: SimilarityService<S, P>,
  catalog: CatalogService<S>,
}

impl<S> Api<S, StoreRandomPicker>
where
  S: ArtistCatalog + ArtistBrowser + Clone,
{
  pub fn new(store: S, limits: BrowseLimits) -> Self {
    Self::with_picker(store, StoreRandomPicker, limits)
  }
}

impl<S, P> Api<S, P>
where
  S: ArtistCatalog + ArtistBrowser + Clone,
  P: ReferencePicker,
{
  pub fn with_picker(store: S, picker: P, limits: BrowseLimits) -> Self {
    Self { similarity: SimilarityService::with_picker(store.clone(), picker), catalog: CatalogService::new(store, limits) }
  }

  /// Handles one request. Never fails: errors become an `{ "error": ... }`
  /// body with the matching status.
  pub async fn handle<B>(&self, req: &Request<B>) -> Response<String> {
    match self.route(req).await {
      Ok(resp) => resp,
      Err(err) => {
        match &err {
          ApiError::Internal(detail) => error!("{} {} failed: {detail}", req.method(), req.uri()),
          other => debug!("{} {} -> {}: {other}", req.method(), req.uri(), other.status()),
        }
        json_response(err.status(), &ErrorDto { error: err.public_message() })
      }
    }
  }

  async fn route<B>(&self, req: &Request<B>) -> Result<Response<String>, ApiError> {
    if req.method() != Method::GET {
      return Err(ApiError::MethodNotAllowed);
    }

    let segments: Vec<&str> = req.uri().path().split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
      ["api", "similar"] => self.similar(&Exhaustive).await,
      ["api", "similar", "optimized"] => self.similar(&Pruned).await,
      ["api", "artists"] => self.artists(req.uri().query()).await,
      ["api", "artists", id] => self.artist(id).await,
      ["api", "genres"] => self.genres().await,
      _ => Err(ApiError::NotFound("Not found".to_string())),
    }
  }

  async fn similar(&self, selector: &dyn CandidateSelector) -> Result<Response<String>, ApiError> {
    let result = self.similarity.run(selector).await?;
    Ok(json_response(StatusCode::OK, &SimilarityResponseDto::from(result)))
  }

  async fn artists(&self, query: Option<&str>) -> Result<Response<String>, ApiError> {
    let request = parse_browse(query)?;
    let resolved = self.catalog.resolve(request.clone())?;
    let page = self.catalog.browse(request).await?;
    Ok(json_response(StatusCode::OK, &ArtistPageDto::new(page, resolved.limit, resolved.offset)))
  }

  async fn artist(&self, raw_id: &str) -> Result<Response<String>, ApiError> {
    let id = urlencoding::decode(raw_id).map_err(|_| ApiError::BadRequest(format!("invalid artist id: {raw_id}")))?;
    let record = self.catalog.get_artist(&ArtistId::new(id.into_owned())).await?;
    Ok(json_response(StatusCode::OK, &ArtistDto::from(record)))
  }

  async fn genres(&self) -> Result<Response<String>, ApiError> {
    let genres = self.catalog.genres().await?;
    Ok(json_response(StatusCode::OK, &GenresDto { genres }))
  }
}

fn parse_browse(query: Option<&str>) -> Result<BrowseRequest, ApiError> {
  let mut request = BrowseRequest::default();
  let Some(query) = query else {
    return Ok(request);
  };

  for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
    match key.as_ref() {
      "genre" => request.genre = Some(value.into_owned()),
      "min_popularity" => request.min_popularity = Some(parse_number(&key, &value)?),
      "order" => request.order = value.parse().map_err(|e| ApiError::BadRequest(format!("{e}")))?,
      "limit" => request.limit = Some(parse_number(&key, &value)?),
      "offset" => request.offset = Some(parse_number(&key, &value)?),
      // unknown parameters are ignored
      _ => {}
    }
  }
  Ok(request)
}

fn parse_number(key: &str, value: &str) -> Result<u32, ApiError> {
  value.trim().parse().map_err(|_| ApiError::BadRequest(format!("invalid value for `{key}`: {value}")))
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<String> {
  let (status, body) = match serde_json::to_string(body) {
    Ok(json) => (status, json),
    Err(e) => {
      error!("failed to encode response body: {e}");
      (StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"Internal server error"}"#.to_string())
    }
  };

  let mut resp = Response::new(body);
  *resp.status_mut() = status;
  resp.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
  resp
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use cadenza_core::domain::{ArtistPage, ArtistRecord, BrowseQuery, GenreCount};
  use cadenza_core::ports::{ArtistWriter, CatalogError, InMemoryCatalog};
  use cadenza_core::similarity::IndexPicker;
  use serde_json::Value;

  fn artist(id: &str, name: &str, genres: &str, popularity: u32) -> ArtistRecord {
    let mut record = ArtistRecord::new(id, name, genres);
    record.popularity = Some(popularity);
    record
  }

  fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(vec![
      artist("1", "Drake", "hip hop, rap", 95),
      artist("2", "Beyonce", "pop, r&b", 90),
      artist("3", "Drakeo", "hip hop, west coast rap", 60),
      artist("4", "Kendrick Lamar", "hip hop, rap, west coast rap", 92),
    ])
  }

  /// Always picks the first artist ("Drake") as the reference.
  fn api(store: InMemoryCatalog) -> Api<InMemoryCatalog, IndexPicker> {
    Api::with_picker(store, IndexPicker::new(|_| 0), BrowseLimits::default())
  }

  fn get(uri: &str) -> Request<()> {
    Request::get(uri).body(()).unwrap()
  }

  fn json(resp: &Response<String>) -> Value {
    serde_json::from_str(resp.body()).unwrap()
  }

  #[tokio::test]
  async fn similar_returns_ranked_matches() {
    let resp = api(catalog()).handle(&get("/api/similar")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");

    let body = json(&resp);
    assert_eq!(body["target_artist"]["spotify_id"], "1");
    assert_eq!(body["target_artist"]["name"], "Drake");
    assert_eq!(body["target_artist"]["genres"], "hip hop, rap");

    let similar = body["similar_artists"].as_array().unwrap();
    assert_eq!(similar.len(), 3);
    assert!(similar.iter().all(|a| a["spotify_id"] != "1"));
    let scores: Vec<f64> = similar.iter().map(|a| a["similarity_score"].as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    assert_eq!(body["metadata"]["total_artists_compared"], 3);
    assert_eq!(body["metadata"]["optimized"], false);
    assert!(body["metadata"]["processing_time_ms"].as_f64().unwrap() >= 0.0);
  }

  #[tokio::test]
  async fn optimized_similarity_only_sees_primary_genre() {
    let resp = api(catalog()).handle(&get("/api/similar/optimized")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json(&resp);
    assert_eq!(body["metadata"]["optimized"], true);
    let ids: Vec<&str> = body["similar_artists"].as_array().unwrap().iter().map(|a| a["spotify_id"].as_str().unwrap()).collect();
    assert!(!ids.contains(&"2"));
    assert!(ids.contains(&"3"));
    assert!(ids.contains(&"4"));
  }

  #[tokio::test]
  async fn empty_catalog_is_not_found() {
    let api = api(InMemoryCatalog::default());
    for uri in ["/api/similar", "/api/similar/optimized"] {
      let resp = api.handle(&get(uri)).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND);
      assert_eq!(json(&resp)["error"], "No artists found");
    }
  }

  #[tokio::test]
  async fn unknown_routes_and_methods() {
    let api = api(catalog());

    let resp = api.handle(&get("/api/nope")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(&resp)["error"], "Not found");

    let post = Request::post("/api/similar").body(()).unwrap();
    let resp = api.handle(&post).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  }

  #[tokio::test]
  async fn browse_applies_filters_and_ordering() {
    let resp = api(catalog()).handle(&get("/api/artists?genre=hip%20hop&order=popularity&limit=2")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json(&resp);
    assert_eq!(body["total"], 3);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["offset"], 0);
    let names: Vec<&str> = body["artists"].as_array().unwrap().iter().map(|a| a["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Drake", "Kendrick Lamar"]);
  }

  #[tokio::test]
  async fn browse_rejects_bad_parameters() {
    let api = api(catalog());
    for uri in ["/api/artists?limit=abc", "/api/artists?limit=0", "/api/artists?order=loudest", "/api/artists?min_popularity=101"] {
      let resp = api.handle(&get(uri)).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
      assert!(json(&resp)["error"].is_string());
    }
  }

  #[tokio::test]
  async fn single_artist_and_genres() {
    let api = api(catalog());

    let resp = api.handle(&get("/api/artists/4")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(&resp)["name"], "Kendrick Lamar");
    assert_eq!(json(&resp)["popularity"], 92);

    let resp = api.handle(&get("/api/artists/404")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = api.handle(&get("/api/genres")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let genres = json(&resp)["genres"].as_array().unwrap().clone();
    assert!(genres.iter().any(|g| g["genre"] == "hip hop" && g["artists"] == 3));
  }

  #[tokio::test]
  async fn artist_id_segment_is_percent_decoded() {
    let store = catalog();
    store.upsert_artists(&[artist("some id?x/y", "Spaced Out", "ambient", 10)]).await.unwrap();
    let api = api(store);

    let resp = api.handle(&get("/api/artists/some%20id%3Fx%2Fy")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(&resp)["spotify_id"], "some id?x/y");

    // `%FF` is not valid UTF-8 once decoded.
    let resp = api.handle(&get("/api/artists/%FF")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[derive(Clone)]
  struct BrokenStore;

  fn broken() -> CatalogError {
    CatalogError::Storage("disk on fire".to_string())
  }

  #[async_trait]
  impl ArtistCatalog for BrokenStore {
    async fn fetch_all_artists(&self) -> Result<Vec<ArtistRecord>, CatalogError> {
      Err(broken())
    }
    async fn fetch_artists_by_primary_genre(&self, _: &str, _: usize) -> Result<Vec<ArtistRecord>, CatalogError> {
      Err(broken())
    }
    async fn fetch_random_artist(&self) -> Result<Option<ArtistRecord>, CatalogError> {
      Err(broken())
    }
  }

  #[async_trait]
  impl ArtistBrowser for BrokenStore {
    async fn browse(&self, _: &BrowseQuery) -> Result<ArtistPage, CatalogError> {
      Err(broken())
    }
    async fn find_artist(&self, _: &ArtistId) -> Result<Option<ArtistRecord>, CatalogError> {
      Err(broken())
    }
    async fn genre_counts(&self) -> Result<Vec<GenreCount>, CatalogError> {
      Err(broken())
    }
  }

  #[tokio::test]
  async fn storage_failures_hide_details() {
    let api = Api::new(BrokenStore, BrowseLimits::default());
    for uri in ["/api/similar", "/api/artists", "/api/genres"] {
      let resp = api.handle(&get(uri)).await;
      assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(json(&resp)["error"], "Internal server error");
      assert!(!resp.body().contains("disk on fire"));
    }
  }
}

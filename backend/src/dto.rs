//! Wire format of the request boundary.
//!
//! Field names follow the public JSON contract (`spotify_id`, `name`,
//! `genres`), which differs from the domain naming.

use cadenza_core::domain::{ArtistPage, ArtistRecord, GenreCount};
use cadenza_core::services::{ReferenceArtist, SimilarityQueryResult};
use cadenza_core::similarity::{ScoredCandidate, StrategyKind};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TargetArtistDto {
  pub spotify_id: String,
  pub name: String,
  pub genres: String,
}

impl From<ReferenceArtist> for TargetArtistDto {
  fn from(artist: ReferenceArtist) -> Self {
    TargetArtistDto { spotify_id: artist.id.into_inner(), name: artist.display_name, genres: artist.genre_tags }
  }
}

#[derive(Debug, Serialize)]
pub struct SimilarArtistDto {
  pub spotify_id: String,
  pub name: String,
  pub genres: String,
  pub similarity_score: f64,
}

impl From<ScoredCandidate> for SimilarArtistDto {
  fn from(candidate: ScoredCandidate) -> Self {
    SimilarArtistDto {
      spotify_id: candidate.id.into_inner(),
      name: candidate.display_name,
      genres: candidate.genre_tags,
      similarity_score: candidate.similarity_score,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct SimilarityMetadataDto {
  pub total_artists_compared: usize,
  pub processing_time_ms: f64,
  pub optimized: bool,
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponseDto {
  pub target_artist: TargetArtistDto,
  pub similar_artists: Vec<SimilarArtistDto>,
  pub metadata: SimilarityMetadataDto,
}

impl From<SimilarityQueryResult> for SimilarityResponseDto {
  fn from(result: SimilarityQueryResult) -> Self {
    let metadata = SimilarityMetadataDto {
      total_artists_compared: result.metadata.candidates_considered,
      processing_time_ms: result.metadata.elapsed_millis,
      optimized: result.metadata.strategy == StrategyKind::Pruned,
    };
    SimilarityResponseDto {
      target_artist: result.reference_artist.into(),
      similar_artists: result.top_matches.into_iter().map(Into::into).collect(),
      metadata,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ArtistDto {
  pub spotify_id: String,
  pub name: String,
  pub genres: String,
  pub popularity: Option<u32>,
  pub followers: Option<u64>,
}

impl From<ArtistRecord> for ArtistDto {
  fn from(record: ArtistRecord) -> Self {
    ArtistDto {
      spotify_id: record.id.into_inner(),
      name: record.display_name,
      genres: record.genre_tags,
      popularity: record.popularity,
      followers: record.followers,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ArtistPageDto {
  pub total: u64,
  pub limit: u32,
  pub offset: u32,
  pub artists: Vec<ArtistDto>,
}

impl ArtistPageDto {
  pub fn new(page: ArtistPage, limit: u32, offset: u32) -> Self {
    ArtistPageDto { total: page.total, limit, offset, artists: page.artists.into_iter().map(Into::into).collect() }
  }
}

#[derive(Debug, Serialize)]
pub struct GenresDto {
  pub genres: Vec<GenreCount>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDto {
  pub error: String,
}

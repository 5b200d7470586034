pub mod catalog_service;
pub mod similarity_service;

pub use catalog_service::{BrowseLimits, BrowseRequest, CatalogService};
pub use similarity_service::{QueryMetadata, ReferenceArtist, SimilarityQueryResult, SimilarityService};

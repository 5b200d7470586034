pub mod catalog;
pub mod memory;
pub mod writer;

pub use catalog::{ArtistBrowser, ArtistCatalog, CatalogError};
pub use memory::InMemoryCatalog;
pub use writer::{ArtistWriter, UpsertOutcome};

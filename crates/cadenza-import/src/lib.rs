pub mod config;
pub mod importer;
pub mod row;

pub use config::ImportConfig;
pub use importer::{CsvImporter, ImportError, ImportReport};

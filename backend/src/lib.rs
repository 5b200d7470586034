mod api;
mod cli;
mod config;
mod dto;
mod infrastructure;

pub use api::{Api, ApiError};
pub use config::{BrowseConfig, EffectiveConfig, LoggingConfig};

use anyhow::{bail, Context};
use cadenza_import::{CsvImporter, ImportConfig};
use cadenza_storage::ArtistStore;
use clap::Parser;
use http::Request;

use crate::cli::{Cli, Command};

pub async fn run() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let logging = LoggingConfig::load().context("load [logging] config")?;
  infrastructure::logging::init(&logging.level);

  match cli.command {
    Command::Config => {
      let effective = EffectiveConfig::load().context("load config")?;
      print!("{}", effective.to_toml()?);
    }
    Command::Import { path } => {
      let store = ArtistStore::new_from_config().context("open artist store")?;
      let importer = CsvImporter::new(store, ImportConfig::load()?);
      let report = importer.import_path(&path).await.with_context(|| format!("import {}", path.display()))?;
      println!("{report}");
    }
    Command::Query(query) => {
      let store = ArtistStore::new_from_config().context("open artist store")?;
      let api = Api::new(store, BrowseConfig::load()?.into());

      let req = Request::get(query.target()).body(())?;
      let resp = api.handle(&req).await;
      println!("{}", resp.status());
      println!("{}", resp.body());
      if !resp.status().is_success() {
        bail!("request failed with status {}", resp.status());
      }
    }
  }

  Ok(())
}

use std::path::PathBuf;

use cadenza_core::domain::ArtistOrder;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cadenza", version, about = "Browse an artist catalog and rank similar artists")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Import (or refresh) artists from a CSV file
  Import {
    /// CSV with at least an id and a name column
    path: PathBuf,
  },
  /// Print the effective configuration as TOML
  Config,
  #[command(flatten)]
  Query(QueryCommand),
}

/// Commands answered through the request boundary.
#[derive(Debug, Subcommand)]
pub enum QueryCommand {
  /// Rank the artists most similar to a random reference artist
  Similar {
    /// Only score artists sharing the reference's primary genre
    #[arg(long)]
    optimized: bool,
  },
  /// List artists
  Artists {
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    min_popularity: Option<u32>,
    #[arg(long, default_value_t = ArtistOrder::Name)]
    order: ArtistOrder,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
  },
  /// Show a single artist
  Artist { id: String },
  /// List genres with their artist counts
  Genres,
  /// Send a raw GET, e.g. `/api/artists?genre=rock`
  Request { target: String },
}

impl QueryCommand {
  /// Path and query of the equivalent `GET` request.
  pub fn target(&self) -> String {
    match self {
      QueryCommand::Similar { optimized: false } => "/api/similar".to_string(),
      QueryCommand::Similar { optimized: true } => "/api/similar/optimized".to_string(),
      QueryCommand::Artists { genre, min_popularity, order, limit, offset } => {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(genre) = genre {
          query.append_pair("genre", genre);
        }
        if let Some(min) = min_popularity {
          query.append_pair("min_popularity", &min.to_string());
        }
        query.append_pair("order", &order.to_string());
        if let Some(limit) = limit {
          query.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = offset {
          query.append_pair("offset", &offset.to_string());
        }
        format!("/api/artists?{}", query.finish())
      }
      QueryCommand::Artist { id } => format!("/api/artists/{}", urlencoding::encode(id)),
      QueryCommand::Genres => "/api/genres".to_string(),
      QueryCommand::Request { target } if target.starts_with('/') => target.clone(),
      QueryCommand::Request { target } => format!("/{target}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn target(args: &[&str]) -> String {
    let cli = Cli::try_parse_from(std::iter::once("cadenza").chain(args.iter().copied())).unwrap();
    match cli.command {
      Command::Query(query) => query.target(),
      other => panic!("not a query command: {other:?}"),
    }
  }

  #[test]
  fn similarity_targets() {
    assert_eq!(target(&["similar"]), "/api/similar");
    assert_eq!(target(&["similar", "--optimized"]), "/api/similar/optimized");
  }

  #[test]
  fn artists_target_encodes_filters() {
    assert_eq!(
      target(&["artists", "--genre", "hip hop", "--order", "popularity", "--limit", "5"]),
      "/api/artists?genre=hip+hop&order=popularity&limit=5"
    );
    assert_eq!(target(&["artists"]), "/api/artists?order=name");
  }

  #[test]
  fn raw_request_gets_leading_slash() {
    assert_eq!(target(&["request", "api/genres"]), "/api/genres");
    assert_eq!(target(&["artist", "abc"]), "/api/artists/abc");
  }

  #[test]
  fn artist_id_is_a_single_escaped_segment() {
    let target = target(&["artist", "some id?x/y"]);
    assert_eq!(target, "/api/artists/some%20id%3Fx%2Fy");
    assert!(http::Request::get(target.as_str()).body(()).is_ok());
  }

  #[test]
  fn bad_order_is_rejected_by_the_parser() {
    assert!(Cli::try_parse_from(["cadenza", "artists", "--order", "loudest"]).is_err());
  }

  #[test]
  fn import_and_config_parse() {
    let cli = Cli::try_parse_from(["cadenza", "import", "artists.csv"]).unwrap();
    assert!(matches!(cli.command, Command::Import { ref path } if path == &PathBuf::from("artists.csv")));
    let cli = Cli::try_parse_from(["cadenza", "config"]).unwrap();
    assert!(matches!(cli.command, Command::Config));
  }
}

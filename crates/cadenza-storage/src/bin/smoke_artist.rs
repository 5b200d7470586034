use cadenza_core::domain::{ArtistId, ArtistRecord};
use cadenza_core::ports::{ArtistBrowser, ArtistWriter};
use cadenza_storage::ArtistStore;
use cadenza_storage::config::StorageConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() {
  // ajusta la ruta si quieres usar otra base de datos
  let store = ArtistStore::open(&StorageConfig::at("cadenza-smoke.db")).expect("failed to open store");

  let mut artist = ArtistRecord::new("0TnOYISbd1XYRBk9myaseg", "Pitbull", "dance pop,latin,miami hip hop,pop");
  artist.popularity = Some(80);
  artist.followers = Some(7_800_000);

  println!("Saving artist with id = {}", artist.id);

  let outcome = store.upsert_artists(std::slice::from_ref(&artist)).await.expect("failed to save artist");
  println!("Upsert: {outcome:?}");

  let loaded = store.find_artist(&ArtistId::from("0TnOYISbd1XYRBk9myaseg")).await.expect("failed to load artist");

  println!("Loaded from DB: {loaded:?}");
}

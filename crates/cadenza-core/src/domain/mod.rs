pub mod artist;
pub mod browse;
pub mod genres;
pub mod ids;

pub use artist::ArtistRecord;
pub use browse::{ArtistOrder, ArtistPage, BrowseQuery, GenreCount};
pub use ids::ArtistId;

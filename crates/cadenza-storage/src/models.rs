use crate::schema::artists;

use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = artists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArtistRow {
  pub id: String,
  pub name: String,
  pub genres: String,
  pub popularity: Option<i32>,
  pub followers: Option<i64>,
  pub created_at: String,
  pub updated_at: String,
}

/// Fila para insertar o actualizar. Los `None` no pisan el valor guardado
/// cuando se usa como changeset.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = artists)]
pub struct NewArtistRow {
  pub id: String,
  pub name: String,
  pub genres: String,
  /// `genres` en minúsculas; es la columna sobre la que filtra el género.
  pub genres_folded: String,
  pub popularity: Option<i32>,
  pub followers: Option<i64>,
}

use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::sqlite::SqliteConnection;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Pragmas aplicados a cada conexión cuando el pool la abre.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
  pub journal_mode: Option<String>,
  pub busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
    let mut pragmas = format!("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};", self.busy_timeout_ms);
    if let Some(mode) = &self.journal_mode {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }

    conn.batch_execute(&pragmas).map_err(r2d2::Error::QueryError)
  }
}

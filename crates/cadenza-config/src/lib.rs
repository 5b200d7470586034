mod backend;
mod error;
mod io;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use error::ConfigError;
pub use io::atomic_write_str;
pub use paths::{BASE_DIR_ENV, CadenzaPaths};

use once_cell::sync::Lazy;

// Singleton de paths (portable / system)
pub static PATHS: Lazy<CadenzaPaths> = Lazy::new(|| CadenzaPaths::new().expect("failed to init CadenzaPaths"));

// Singleton del backend de config
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> = Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));

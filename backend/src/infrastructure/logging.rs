use env_logger::Env;

/// Installs `env_logger`. `RUST_LOG`, when set, wins over `level`.
pub fn init(level: &str) {
  let env = Env::default().default_filter_or(level);

  // A second init (tests, embedding) is not fatal.
  if let Err(e) = env_logger::Builder::from_env(env).format_timestamp_millis().try_init() {
    eprintln!("logger already initialised: {e}");
  }
}

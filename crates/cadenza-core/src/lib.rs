pub mod domain;
pub mod errors;
pub mod ports;
pub mod services;
pub mod similarity;

pub use errors::CoreError;

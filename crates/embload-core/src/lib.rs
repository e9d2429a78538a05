pub mod config;
pub mod error;
pub mod types;

pub use config::LoaderConfig;
pub use error::{LoaderError, Result};
pub use types::*;

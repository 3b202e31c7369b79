//! Input validation for tool arguments

pub mod validation;

pub use validation::{InputValidator, ValidationConfig};

use crate::config::ServerConfig;

impl From<&ServerConfig> for ValidationConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            allow_writes: !config.read_only,
            ..ValidationConfig::default()
        }
    }
}

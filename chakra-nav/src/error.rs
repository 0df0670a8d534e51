//! Error types for ChakraNav

use thiserror::Error;

use crate::platform::DeviceKind;

/// ChakraNav error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Required {kind} '{name}' not found on platform")]
    MissingDevice { name: String, kind: DeviceKind },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Simulation error: {0}")]
    Sim(#[from] chakra_sim::Error),

    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;

//! Error types for the dispatch core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Invalid OSC address '{0}': {1}")]
    InvalidAddress(String, String),
}

pub type Result<T> = std::result::Result<T, Error>;

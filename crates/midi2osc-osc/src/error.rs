//! Error types for the OSC sending side.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OSC packet too large: {0} bytes")]
    PacketTooLarge(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

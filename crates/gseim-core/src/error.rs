//! Error types for gseim-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate element name: {0}")]
    DuplicateDevice(String),
}

pub type Result<T> = std::result::Result<T, Error>;

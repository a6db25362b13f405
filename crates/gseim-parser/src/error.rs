//! Error types for gseim-parser.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("line {line}: unknown element type '{element}'")]
    UnknownElement { element: String, line: usize },

    #[error("line {line}: invalid value '{value}' for {key}")]
    InvalidValue {
        key: String,
        value: String,
        line: usize,
    },

    #[error("scenario is missing required solve parameter '{0}'")]
    MissingSolveParam(&'static str),

    #[error(transparent)]
    Circuit(#[from] gseim_core::Error),
}

impl Error {
    pub(crate) fn at(line: usize, message: impl Into<String>) -> Self {
        Error::ParseError {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

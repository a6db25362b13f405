//! Run errors and their process exit codes.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("cannot read input file '{path}': {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read config file '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad config file '{path}' at line {line}: {message}")]
    BadConfig {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: gseim_parser::Error,
    },

    #[error("simulation failed: {0}")]
    Numeric(#[from] gseim_solver::Error),

    #[error("cannot write result file '{path}': {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    /// Exit code: 1 usage/input/config, 2 parse, 3 numeric, 4 output I/O.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Input { .. } | RunError::Config { .. } | RunError::BadConfig { .. } => 1,
            RunError::Parse { .. } => 2,
            RunError::Numeric(_) => 3,
            RunError::Output { .. } => 4,
        }
    }
}

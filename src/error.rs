//! Error types for task-timeline
//!
//! The timeline engine itself never fails; errors come from reading input,
//! configuration and command-line values.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid timezone '{0}'. Use an IANA name such as Europe/Moscow")]
    InvalidTimezone(String),

    #[error("Invalid date '{0}'. Use YYYY-MM-DD format")]
    InvalidDate(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidTimezone(_)
            | Error::InvalidDate(_)
            | Error::InvalidArgument(_)
            | Error::ReadFile { .. }
            | Error::Json(_)
            | Error::TomlParse(_) => exit_codes::USER_ERROR,

            Error::Io(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

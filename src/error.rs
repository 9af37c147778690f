//! Error types for configuration and lesson loading.
//!
//! The reading core itself has no error paths: degraded layouts and rejected
//! selections are ordinary values.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum LessonError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lesson text is empty")]
    Empty,

    #[error("invalid translation table: {0}")]
    Translations(#[from] toml::de::Error),
}

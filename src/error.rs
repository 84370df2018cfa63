use std::{path::PathBuf, result::Result as StdResult};

use thiserror::Error;

pub type Result<T> = StdResult<T, Error>;

/// An enum for describing and handling various errors encountered while
/// configuring `relnote` or assembling a changelog.
///
/// Message parsing, type classification and reference extraction never fail;
/// they degrade to non-conventional results instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigFormat(#[from] toml::de::Error),

    #[error("invalid author filter: {0}")]
    AuthorFilter(#[from] regex::Error),

    #[error("failed to convert date/time to string format")]
    TimeStrFormat(#[from] time::error::Format),

    #[error("no changes found for release {0}")]
    EmptyChangelog(String),
}

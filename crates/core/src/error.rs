use std::path::PathBuf;
use thiserror::Error;

/// Problems that stop a run before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown folder {0:?} (configured: {1})")]
    UnknownFolder(String, String),
    #[error("no readable target folders")]
    NoTargetFolders,
    #[error("could not determine the home directory")]
    NoHomeDir,
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("source vanished: {0:?}")]
    SourceMissing(PathBuf),
    #[error("destination already exists: {0:?}")]
    DestinationExists(PathBuf),
    #[error("{op} {path:?}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

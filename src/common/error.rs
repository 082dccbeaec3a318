use std::path::PathBuf;

/// All errors that can stop the ippool binary
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Pool(#[from] ip_pool::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("No configuration provided. Either use --config to specify a file or set --pool (see --help)")]
    NoConfig,
}

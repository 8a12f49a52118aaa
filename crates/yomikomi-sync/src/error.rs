use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] yomikomi_core::error::YomikomiError),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("NewsAPI error: {0}")]
    NewsApi(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(&'static str),

    #[error("Invalid folder name: {0:?}")]
    InvalidFolderName(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

use codeslice_chunker::ChunkerError;
use codeslice_symbols::ParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot requires at least one target chunk")]
    NoTargets,

    #[error("Snapshot targets must all come from the same file, got: {}", .paths.join(", "))]
    MixedFiles { paths: Vec<String> },

    #[error("File not indexed: {0}")]
    FileNotIndexed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Chunker(#[from] ChunkerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SnapshotError {
    pub fn file_not_indexed(path: impl Into<String>) -> Self {
        Self::FileNotIndexed(path.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TrackSearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Extraction error: {0}")]
    Extraction(String),
}

pub type Result<T> = std::result::Result<T, TrackSearchError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

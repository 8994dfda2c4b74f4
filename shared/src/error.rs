use thiserror::Error;

#[derive(Debug, Error)]
pub enum SharedError {
    #[error("image error: {0}")]
    Image(String),
    #[error("image holds {found} bytes, expected {expected}")]
    ImageSize { expected: usize, found: usize },
    #[error("script error at step {step}: {message}")]
    Script { step: usize, message: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("storage error: {0}")]
    Storage(String),
}

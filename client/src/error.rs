use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to relay failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid field {0:?}, expected key=value")]
    InvalidField(String),
}

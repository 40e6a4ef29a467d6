use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request to stats service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stats service responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode stats service response: {0}")]
    Decode(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

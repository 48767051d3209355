use thiserror::Error;

use crate::protocol::Response;

#[derive(Error, Debug)]
pub enum MiniqError {
    #[error("{0}")]
    Validation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server error: {0}")]
    Remote(Response),
}

impl From<tokio_tungstenite::tungstenite::Error> for MiniqError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        MiniqError::Connection(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MiniqError>;

use thiserror::Error;

use crate::endpoint::Level;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectoryError {
    #[error("{path} not found")]
    NotFound { path: String },
    #[error("directory service failed with HTTP {status}")]
    Server { status: u16 },
    #[error("unexpected HTTP {status}")]
    UnexpectedStatus { status: u16 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("no {0} selected")]
    MissingSelection(Level),
}

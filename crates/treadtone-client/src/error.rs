//! Error types for the audio clients
use thiserror::Error;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Motion log file could not be created or written
    #[error("motion log IO error: {0}")]
    MotionLogIo(#[from] std::io::Error),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

use std::fmt;

/// Error types for the ingest and export plumbing around the decoder.
/// The decoder itself never errors; it returns whatever could be recovered.
#[derive(Debug)]
pub enum AvlError {
    /// I/O errors
    Io(std::io::Error),
    /// Device identity handshake failures
    Handshake(String),
    /// Export format error
    Export(String),
}

impl fmt::Display for AvlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvlError::Io(err) => write!(f, "I/O error: {}", err),
            AvlError::Handshake(msg) => write!(f, "Handshake error: {}", msg),
            AvlError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for AvlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AvlError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AvlError {
    fn from(err: std::io::Error) -> Self {
        AvlError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, AvlError>;

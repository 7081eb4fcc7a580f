use thiserror::Error;

/// Result type alias for flux operations
pub type Result<T> = std::result::Result<T, FluxError>;

/// Errors that can occur while acquiring, loading or exporting flux data
///
/// The processing pipeline itself never fails; these cover the edges around it.
#[derive(Debug, Error)]
pub enum FluxError {
    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Capture data is structurally valid but semantically unusable
    #[error("Invalid capture: {0}")]
    InvalidCapture(String),

    /// Parse error at specific offset
    #[error("Parse error at offset {offset}: {message}")]
    ParseError {
        /// Byte offset where error occurred
        offset: usize,
        /// Error message
        message: String,
    },

    /// The source holds no revolutions for the requested position
    #[error("Track {track} side {side} was not captured")]
    TrackNotCaptured {
        /// Track number
        track: u8,
        /// Side number
        side: u8,
    },

    /// A captured revolution used the ordinal reserved for consensus revolutions
    #[error("Revolution ordinal {0} is reserved for consensus revolutions")]
    ReservedRevolution(u8),

    /// Configuration could not be decoded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FluxError {
    /// Create a parse error with context
    pub fn parse<S: Into<String>>(offset: usize, message: S) -> Self {
        FluxError::ParseError {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid capture error
    pub fn invalid_capture<S: Into<String>>(message: S) -> Self {
        FluxError::InvalidCapture(message.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        FluxError::Config(message.into())
    }
}

impl From<toml::de::Error> for FluxError {
    fn from(err: toml::de::Error) -> Self {
        FluxError::Config(err.to_string())
    }
}

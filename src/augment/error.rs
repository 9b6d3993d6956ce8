use std::fmt;

/// Failure of the optional remote text model. The synthesizer is never affected.
#[derive(Debug)]
pub enum AugmentError {
    /// No API key configured
    NotConfigured,

    /// Request could not be sent or the connection failed
    Transport(reqwest::Error),

    /// Service answered with a non-2xx status
    Status { status: u16, body: String },

    /// Response body was not the expected JSON
    MalformedBody { context: String, source: serde_json::Error },

    /// Request payload could not be serialized
    Serialize { context: String, source: serde_json::Error },

    /// Response parsed but held no usable text
    EmptyResponse,
}

impl fmt::Display for AugmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AugmentError::NotConfigured => {
                write!(f, "Text model is not configured (missing API key)")
            }
            AugmentError::Transport(e) => write!(f, "Text model request failed: {}", e),
            AugmentError::Status { status, body } => {
                write!(f, "Text model API error ({}):\n{}", status, body)
            }
            AugmentError::MalformedBody { context, source } => {
                write!(f, "Malformed text model response ({}): {}", context, source)
            }
            AugmentError::Serialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            AugmentError::EmptyResponse => write!(f, "Text model returned no result"),
        }
    }
}

impl std::error::Error for AugmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AugmentError::Transport(e) => Some(e),
            AugmentError::MalformedBody { source, .. } => Some(source),
            AugmentError::Serialize { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AugmentError {
    fn from(e: reqwest::Error) -> Self {
        AugmentError::Transport(e)
    }
}

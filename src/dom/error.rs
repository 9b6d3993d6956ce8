use std::fmt;

#[derive(Debug)]
pub enum SnapshotError {
    /// Snapshot file could not be read
    Io { path: String, source: std::io::Error },

    /// Snapshot JSON did not match the expected shape
    JsonParse { context: String, source: serde_json::Error },

    /// The snapshot root was a text node
    RootNotElement,

    /// No element was marked as selected, or the requested index is out of range
    TargetNotFound(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io { path, source } => {
                write!(f, "Failed to read snapshot '{}': {}", path, source)
            }
            SnapshotError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            SnapshotError::RootNotElement => {
                write!(f, "Snapshot root must be an element node")
            }
            SnapshotError::TargetNotFound(msg) => {
                write!(f, "Target element not found: {}", msg)
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io { source, .. } => Some(source),
            SnapshotError::JsonParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

use thiserror::Error;

/// Result type for coordinate parsing and classification
pub type Result<T> = std::result::Result<T, CoordinateError>;

/// Things that can be wrong with a dependency line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("Malformed coordinate '{token}': expected at least 3 ':'-separated parts, found {found}")]
    TooFewParts { token: String, found: usize },

    #[error("Malformed coordinate '{token}': empty component at position {position}")]
    EmptyComponent { token: String, position: usize },

    #[error("Malformed coordinate '{token}': unknown scope '{scope}'")]
    UnknownScope { token: String, scope: String },

    #[error("Line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<CoordinateError>,
    },
}

impl CoordinateError {
    /// Attach the 1-based report line number
    pub fn at_line(self, line: usize) -> Self {
        CoordinateError::AtLine {
            line,
            source: Box::new(self),
        }
    }

    /// The offending coordinate token
    pub fn token(&self) -> &str {
        match self {
            CoordinateError::TooFewParts { token, .. }
            | CoordinateError::EmptyComponent { token, .. }
            | CoordinateError::UnknownScope { token, .. } => token,
            CoordinateError::AtLine { source, .. } => source.token(),
        }
    }
}

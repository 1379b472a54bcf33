use std::path::PathBuf;

use thiserror::Error;

/// Main error type for control mapper operations
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column '{column}' in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for control mapper operations
pub type Result<T> = std::result::Result<T, MapperError>;

impl MapperError {
    /// Check if this error means the backing file is simply absent,
    /// as opposed to present but unreadable or malformed
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, MapperError::SourceNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MapperError::SourceNotFound(PathBuf::from("data/soc2_controls.csv"));
        assert_eq!(err.to_string(), "Source not found: data/soc2_controls.csv");

        let err = MapperError::MissingColumn {
            path: PathBuf::from("m.csv"),
            column: "source_id".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required column 'source_id' in m.csv"
        );
    }

    #[test]
    fn test_source_unavailable_errors() {
        assert!(MapperError::SourceNotFound(PathBuf::from("x.csv")).is_source_unavailable());
        assert!(!MapperError::Config("bad".to_string()).is_source_unavailable());
        assert!(!MapperError::MissingColumn {
            path: PathBuf::from("x.csv"),
            column: "id".to_string(),
        }
        .is_source_unavailable());
    }
}

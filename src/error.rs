//! Error types for loading content records

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `ContentError`
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors raised while loading or interpreting content records.
///
/// Everything except `RootNotFound` and `Config` is local to a single file
/// and is collected by the store instead of aborting the batch.
#[derive(Error, Debug)]
pub enum ContentError {
    /// No parseable metadata block at the start of the file
    #[error("malformed record {path}: {reason}")]
    MalformedRecord { path: PathBuf, reason: String },

    /// Opening sentinel without a matching closing sentinel
    #[error("unterminated metadata in {path}: missing closing `{sentinel}`")]
    UnterminatedMetadata {
        path: PathBuf,
        sentinel: &'static str,
    },

    /// Two files resolve to the same published location
    #[error("duplicate record {path}: `{location}` is already published by {existing}")]
    DuplicateRecord {
        path: PathBuf,
        existing: PathBuf,
        location: String,
    },

    /// The `date` field could not be parsed into a timestamp
    #[error("invalid date in {path}: {value:?}")]
    InvalidDate { path: PathBuf, value: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("content root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ContentError {
    /// Create an I/O error tagged with the offending path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_mentions_path() {
        let err = ContentError::MalformedRecord {
            path: PathBuf::from("posts/broken.md"),
            reason: "no metadata block".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("posts/broken.md"));
        assert!(msg.contains("no metadata block"));
    }

    #[test]
    fn test_unterminated_mentions_sentinel() {
        let err = ContentError::UnterminatedMetadata {
            path: PathBuf::from("a.md"),
            sentinel: "+++",
        };
        let msg = err.to_string();
        assert!(msg.contains("`+++`"));
        assert!(msg.contains("a.md"));
    }

    #[test]
    fn test_config_error_message() {
        let err = ContentError::Config("bad timezone".to_string());
        assert!(err.to_string().contains("bad timezone"));
    }
}

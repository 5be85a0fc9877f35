use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChapterSyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP status error: {status}")]
    HttpStatus { status: u16 },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Markers missing in {path}")]
    MarkersMissing { path: String },

    #[error("Markers appear more than once in {path}")]
    MarkersDuplicated { path: String },

    #[error("End marker does not follow start marker in {path}")]
    MarkersOutOfOrder { path: String },

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid selector: {reason}")]
    Selector { reason: String },

    #[error("Failed to replace {path}: {reason}")]
    Persist { path: String, reason: String },

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl ChapterSyncError {
    /// True for per-file problems that skip the file instead of aborting the run.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            ChapterSyncError::FileNotFound { .. }
                | ChapterSyncError::MarkersMissing { .. }
                | ChapterSyncError::MarkersDuplicated { .. }
                | ChapterSyncError::MarkersOutOfOrder { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ChapterSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skippable_errors() {
        let missing = ChapterSyncError::FileNotFound {
            path: "physics.html".to_string(),
        };
        assert!(missing.is_skippable());
        assert_eq!(missing.to_string(), "File not found: physics.html");

        let markers = ChapterSyncError::MarkersMissing {
            path: "math.html".to_string(),
        };
        assert!(markers.is_skippable());

        let duplicated = ChapterSyncError::MarkersDuplicated {
            path: "math.html".to_string(),
        };
        assert!(duplicated.is_skippable());

        let status = ChapterSyncError::HttpStatus { status: 503 };
        assert!(!status.is_skippable());
        assert_eq!(status.to_string(), "HTTP status error: 503");
    }
}

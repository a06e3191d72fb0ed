//! Error types for Spotlight
//!
//! Matching and palette transitions are infallible; errors only arise while
//! loading a page, parsing configuration, or talking to the host.

use thiserror::Error;

/// Main error type for Spotlight operations
#[derive(Error, Debug)]
pub enum SpotlightError {
    #[error("Failed to read page '{0}': {1}")]
    PageReadError(String, std::io::Error),

    #[error("Invalid target selector '{0}': {1}")]
    InvalidSelector(String, String),

    #[error("Invalid shortcut '{0}': {1}")]
    InvalidShortcut(String, String),

    #[error("Failed to load config '{0}': {1}")]
    ConfigError(String, String),

    #[error("Failed to navigate to '{0}': {1}")]
    NavigationError(String, String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for Spotlight operations
pub type Result<T> = std::result::Result<T, SpotlightError>;

impl SpotlightError {
    /// Check if this error is recoverable (the palette can keep running)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SpotlightError::NavigationError(_, _))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_errors_are_recoverable() {
        let err = SpotlightError::NavigationError("/about".into(), "no opener".into());
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Failed to navigate to '/about': no opener");
    }

    #[test]
    fn load_errors_are_fatal() {
        let err = SpotlightError::InvalidSelector("".into(), "empty selector".into());
        assert!(!err.is_recoverable());
        let err = SpotlightError::ConfigError("x.json".into(), "bad".into());
        assert!(!err.is_recoverable());
    }
}

//! Error types for proximity search.
//!
//! Lifecycle misuse (querying before `prepare`, adding after `prepare`,
//! unknown anchor ids) is a programming error and panics. Everything a caller
//! can reasonably recover from surfaces as a [`SearchError`].

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Rejected coordinate, radius or point set.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SearchError::InvalidInput("x must be finite".into());
        assert_eq!(err.to_string(), "Invalid input: x must be finite");

        let err = SearchError::InvalidConfig("bad fraction".into());
        assert_eq!(err.to_string(), "Invalid configuration: bad fraction");
    }

    #[test]
    fn test_io_conversion() {
        fn open_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.json")?)
        }

        assert!(matches!(open_missing(), Err(SearchError::Io(_))));
    }
}

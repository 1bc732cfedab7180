//! Error types for module loaders

use std::fmt;

#[derive(Debug)]
pub enum PreloadError {
    /// The loader reported a failure
    Load(String),
    /// The loader failed with an underlying error
    Source(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for PreloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreloadError::Load(msg) => write!(f, "Load failed: {}", msg),
            PreloadError::Source(err) => write!(f, "Load failed: {}", err),
        }
    }
}

impl std::error::Error for PreloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreloadError::Source(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<String> for PreloadError {
    fn from(msg: String) -> Self {
        PreloadError::Load(msg)
    }
}

impl From<&str> for PreloadError {
    fn from(msg: &str) -> Self {
        PreloadError::Load(msg.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for PreloadError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        PreloadError::Source(err)
    }
}

pub type Result<T> = std::result::Result<T, PreloadError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_load_error_display() {
        let err = PreloadError::from("chunk missing");
        assert_eq!(format!("{}", err), "Load failed: chunk missing");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_source_error_display() {
        let inner: Box<dyn std::error::Error + Send + Sync> =
            Box::new(std::io::Error::new(std::io::ErrorKind::Other, "socket closed"));
        let err = PreloadError::from(inner);
        assert_eq!(format!("{}", err), "Load failed: socket closed");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_is_debug() {
        let err = PreloadError::Load("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Load"));
    }
}

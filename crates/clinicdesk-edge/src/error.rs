//! Error types for the ClinicDesk edge

use axum::http::StatusCode;
use std::fmt;

#[derive(Debug)]
pub enum EdgeError {
    Http(reqwest::Error),
    /// Upstream answered with a non-success status
    UpstreamStatus(u16),
    InvalidUrl(url::ParseError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl EdgeError {
    /// Status returned to the dashboard when a foreground fetch fails
    pub fn status_code(&self) -> StatusCode {
        match self {
            EdgeError::UpstreamStatus(code) if *code == 404 => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl fmt::Display for EdgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeError::Http(err) => write!(f, "HTTP error: {}", err),
            EdgeError::UpstreamStatus(code) => write!(f, "Upstream returned status {}", code),
            EdgeError::InvalidUrl(err) => write!(f, "Invalid URL: {}", err),
            EdgeError::Io(err) => write!(f, "IO error: {}", err),
            EdgeError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for EdgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EdgeError::Http(err) => Some(err),
            EdgeError::InvalidUrl(err) => Some(err),
            EdgeError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EdgeError {
    fn from(err: reqwest::Error) -> Self {
        EdgeError::Http(err)
    }
}

impl From<url::ParseError> for EdgeError {
    fn from(err: url::ParseError) -> Self {
        EdgeError::InvalidUrl(err)
    }
}

impl From<std::io::Error> for EdgeError {
    fn from(err: std::io::Error) -> Self {
        EdgeError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for EdgeError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        EdgeError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EdgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_display() {
        let err = EdgeError::UpstreamStatus(503);
        assert_eq!(format!("{}", err), "Upstream returned status 503");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_upstream_not_found_maps_to_404() {
        assert_eq!(
            EdgeError::UpstreamStatus(404).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_invalid_url_display() {
        let err = EdgeError::from(url::Url::parse("not a url").unwrap_err());
        assert!(format!("{}", err).starts_with("Invalid URL"));
    }

    #[test]
    fn test_config_error_display() {
        let err = EdgeError::Config("missing UPSTREAM_URL".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: missing UPSTREAM_URL"
        );
    }

    #[test]
    fn test_error_is_debug() {
        let err = EdgeError::Config("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Config"));
    }
}

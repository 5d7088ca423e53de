//! Error types for the Sagemcom exporter

use thiserror::Error;

/// Fatal application errors, surfaced at startup
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid required configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or IO error
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Address parsing error
    #[error("Address parse error")]
    AddrParse(#[from] std::net::AddrParseError),
}

/// Recoverable errors from a router collection cycle
///
/// The variant decides the Collector's reaction: `Auth` invalidates the
/// session and fails the cycle, `Fetch` degrades a single domain, and
/// `Transport` fails the whole cycle while the registry keeps its previous
/// snapshot.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Router rejected credentials or the session expired
    #[error("Authentication rejected: {0}")]
    Auth(String),

    /// A single data domain failed to retrieve or parse
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Router unreachable or request timed out
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::Transport(error.to_string())
        } else {
            Self::Fetch(error.to_string())
        }
    }
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = AppError::Config("ROUTER_HOST is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: ROUTER_HOST is not set"
        );
    }

    #[test]
    fn test_auth_error() {
        let err = ClientError::Auth("bad password".to_string());
        assert_eq!(err.to_string(), "Authentication rejected: bad password");
    }

    #[test]
    fn test_fetch_error() {
        let err = ClientError::Fetch("missing field".to_string());
        assert_eq!(err.to_string(), "Fetch failed: missing field");
    }

    #[test]
    fn test_transport_error() {
        let err = ClientError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_addr_parse_error_conversion() {
        let parse_result = "invalid".parse::<std::net::IpAddr>();
        assert!(parse_result.is_err());
        let app_err: AppError = parse_result.unwrap_err().into();
        assert!(matches!(app_err, AppError::AddrParse(_)));
    }
}

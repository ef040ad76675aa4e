//! Error types for ghkit.

use thiserror::Error;

/// Main error type for ghkit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(String),

    /// Token missing, expired or rejected (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Token lacks permission for the resource (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource does not exist (404), or a lookup found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned any other error status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Input rejected before sending, or a response we could not interpret
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local file access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Error::Unauthorized(message),
            403 => Error::Forbidden(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }

    /// Whether the error means the resource is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result type alias for ghkit operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            Error::from_status(401, "Bad credentials"),
            Error::Unauthorized(_)
        ));
        assert!(matches!(Error::from_status(403, "nope"), Error::Forbidden(_)));
        assert!(Error::from_status(404, "Not Found").is_not_found());

        match Error::from_status(422, "Validation Failed") {
            Error::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Validation Failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        let err = Error::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
        assert_eq!(
            Error::InvalidData("repo cannot be empty".to_string()).to_string(),
            "Invalid data: repo cannot be empty"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}

//! Unified error types and result handling.
//!
//! Gateway failures are split into transport failures (no response at all) and API
//! failures (the server answered with a failure status). Validation errors are raised
//! locally before any call is issued. The coordinator reduces all of these to a message
//! stored on the relevant cache; they are never handed back to the UI layer.

use thiserror::Error;

/// HTTP status the gateway uses for "resource does not exist".
pub const NOT_FOUND_STATUS: u16 = 404;

/// All errors that can occur inside the synchronization layer.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received from the gateway.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },

    /// The server responded with a failure status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// A client-side precondition rejected the request before it was sent.
    #[error("Validation error: {message}")]
    Validation {
        /// What precondition failed
        message: String,
    },

    /// A response body could not be decoded.
    #[error("Decode error: {message}")]
    Decode {
        /// Decoder message
        message: String,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },
}

impl Error {
    /// Builds a validation error from anything printable.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True when the server reported that the requested resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Api {
                status: NOT_FOUND_STATUS,
                ..
            }
        )
    }

    /// Reduces the error to the plain message stored on a cache.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Transport { message }
            | Self::Api { message, .. }
            | Self::Validation { message }
            | Self::Decode { message }
            | Self::Config { message } => message.clone(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_only_for_404_api_errors() {
        let missing = Error::Api {
            status: 404,
            message: "Appointment not found".to_string(),
        };
        let forbidden = Error::Api {
            status: 403,
            message: "Forbidden".to_string(),
        };
        let offline = Error::Transport {
            message: "connection refused".to_string(),
        };

        assert!(missing.is_not_found());
        assert!(!forbidden.is_not_found());
        assert!(!offline.is_not_found());
    }

    #[test]
    fn test_message_strips_variant_prefix() {
        let err = Error::validation("Passwords do not match");
        assert_eq!(err.message(), "Passwords do not match");
        assert_eq!(err.to_string(), "Validation error: Passwords do not match");
    }
}

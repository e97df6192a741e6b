use thiserror::Error;

/// Result type alias for check operations
pub type Result<T> = std::result::Result<T, DnsAuthError>;

/// Result type alias for a single DNS query
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// A DNS-over-HTTPS query that did not produce a usable answer set
#[derive(Error, Debug)]
pub enum TransportError {
    /// The resolver answered with a non-success HTTP status
    #[error("DNS query failed: {reason}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Status description (canonical reason phrase)
        reason: String,
    },

    /// The HTTP transaction itself did not complete
    #[error("DNS query failed: {0}")]
    Http(String),

    /// The response body was not valid DNS-JSON
    #[error("malformed DNS response: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    /// Returns the HTTP status code if the resolver sent one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Errors that can occur while checking a domain or talking to the log backend
#[derive(Error, Debug)]
pub enum DnsAuthError {
    /// The address to check is empty or not a valid hostname / email address
    #[error("{0}")]
    InvalidAddress(String),

    /// The SPF query failed; this aborts the whole check
    #[error("SPF check failed: {0}")]
    Evaluation(#[source] TransportError),

    /// The log backend returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the backend
        message: String,
    },

    /// HTTP request to the log backend failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl DnsAuthError {
    /// Returns true if the error replaces the whole report
    #[must_use]
    pub const fn is_fatal_check_error(&self) -> bool {
        matches!(self, Self::InvalidAddress(_) | Self::Evaluation(_))
    }

    /// Returns true if the error is the caller's fault
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidAddress(_))
    }

    /// Returns the HTTP status code if one is known
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            Self::Evaluation(e) => e.status_code(),
            _ => None,
        }
    }
}

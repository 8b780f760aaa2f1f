//! Error types and failure classification for the provider layer.
//!
//! This module provides:
//! - [`ProviderError`]: The error enum returned by every external provider call
//! - [`ProviderErrorKind`]: The tagged kind that callers branch on

mod kind;

pub use kind::ProviderErrorKind;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while calling an external provider.
///
/// Provider errors never cross a component boundary as a failure of the
/// overall valuation: the owning component logs them and degrades to an
/// absent result. Use [`kind`](Self::kind) to classify them.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Credentials for this provider are missing.
    #[error("Provider not configured: {provider}")]
    NotConfigured {
        /// The provider lacking configuration
        provider: String,
    },

    /// The request input was rejected before or by the provider.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider has no record matching the request.
    #[error("Not found: {provider} - {message}")]
    NotFound {
        /// The provider that returned no data
        provider: String,
        /// What was being looked up
        message: String,
    },

    /// The provider refused our credentials or plan (HTTP 401/403).
    #[error("Unauthorized: {provider}")]
    Unauthorized {
        /// The provider that refused the request
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider returned an unexpected HTTP status.
    #[error("HTTP {status}: {provider}")]
    Http {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The response body could not be decoded or lacked required fields.
    #[error("Malformed response: {provider} - {message}")]
    MalformedResponse {
        /// The provider that sent the response
        provider: String,
        /// Decoding failure details
        message: String,
    },

    /// A provider-reported failure status (e.g. a non-OK `status` field).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ProviderError {
    /// Returns the tagged kind for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use estimo_market_data::errors::{ProviderError, ProviderErrorKind};
    ///
    /// let error = ProviderError::RateLimited { provider: "ZONEVAL".to_string() };
    /// assert_eq!(error.kind(), ProviderErrorKind::RateLimited);
    /// assert!(!error.kind().is_request_scoped());
    /// ```
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::NotConfigured { .. } => ProviderErrorKind::NotConfigured,
            Self::InvalidInput(_) => ProviderErrorKind::InvalidInput,
            Self::NotFound { .. } => ProviderErrorKind::NotFound,
            Self::Unauthorized { .. } => ProviderErrorKind::Unauthorized,
            Self::RateLimited { .. } => ProviderErrorKind::RateLimited,
            Self::Timeout { .. } => ProviderErrorKind::Timeout,
            Self::Http { .. } | Self::ProviderError { .. } => ProviderErrorKind::Upstream,
            Self::MalformedResponse { .. } => ProviderErrorKind::Malformed,
            Self::Network(e) if e.is_timeout() => ProviderErrorKind::Timeout,
            Self::Network(_) => ProviderErrorKind::Network,
        }
    }

    /// Maps a non-success HTTP status to the matching error.
    pub fn from_status(provider: &str, status: StatusCode) -> Self {
        let provider = provider.to_string();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized { provider },
            StatusCode::NOT_FOUND => Self::NotFound {
                provider,
                message: "resource not found".to_string(),
            },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited { provider },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::InvalidInput(format!("{} rejected the request ({})", provider, status))
            }
            other => Self::Http {
                provider,
                status: other.as_u16(),
            },
        }
    }

    /// Maps a transport failure, keeping timeouts distinguishable.
    pub fn transport(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::Network(err)
        }
    }

    pub fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_request_scoped() {
        let error = ProviderError::NotFound {
            provider: "ZONEVAL".to_string(),
            message: "CEP not found".to_string(),
        };
        assert_eq!(error.kind(), ProviderErrorKind::NotFound);
        assert!(error.kind().is_request_scoped());
    }

    #[test]
    fn test_invalid_input_is_request_scoped() {
        let error = ProviderError::InvalidInput("zipcode 123".to_string());
        assert!(error.kind().is_request_scoped());
    }

    #[test]
    fn test_rate_limited_is_not_request_scoped() {
        let error = ProviderError::RateLimited {
            provider: "GOOGLE_PLACES".to_string(),
        };
        assert!(!error.kind().is_request_scoped());
    }

    #[test]
    fn test_provider_error_is_upstream() {
        let error = ProviderError::ProviderError {
            provider: "GOOGLE_PLACES".to_string(),
            message: "UNKNOWN_ERROR".to_string(),
        };
        assert_eq!(error.kind(), ProviderErrorKind::Upstream);
    }

    #[test]
    fn test_from_status_mapping() {
        assert_eq!(
            ProviderError::from_status("ZONEVAL", StatusCode::FORBIDDEN).kind(),
            ProviderErrorKind::Unauthorized
        );
        assert_eq!(
            ProviderError::from_status("ZONEVAL", StatusCode::NOT_FOUND).kind(),
            ProviderErrorKind::NotFound
        );
        assert_eq!(
            ProviderError::from_status("ZONEVAL", StatusCode::TOO_MANY_REQUESTS).kind(),
            ProviderErrorKind::RateLimited
        );
        assert_eq!(
            ProviderError::from_status("ZONEVAL", StatusCode::BAD_REQUEST).kind(),
            ProviderErrorKind::InvalidInput
        );
        match ProviderError::from_status("ZONEVAL", StatusCode::BAD_GATEWAY) {
            ProviderError::Http { status, .. } => assert_eq!(status, 502),
            other => panic!("Expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let error = ProviderError::RateLimited {
            provider: "ZONEVAL".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: ZONEVAL");

        let error = ProviderError::malformed("NOMINATIM", "missing address");
        assert_eq!(
            format!("{}", error),
            "Malformed response: NOMINATIM - missing address"
        );
    }
}

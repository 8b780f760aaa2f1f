/// Tagged classification of a provider failure.
///
/// Components use the kind to decide how far a failure reaches: a
/// request-scoped failure only voids the current lookup, anything else
/// means the provider is unusable for the rest of the operation.
///
/// | Kind | Request scoped? |
/// |------|-----------------|
/// | `InvalidInput` | Yes |
/// | `NotFound` | Yes |
/// | `NotConfigured` | No |
/// | `Unauthorized` | No |
/// | `RateLimited` | No |
/// | `Timeout` | No |
/// | `Upstream` | No |
/// | `Malformed` | No |
/// | `Network` | No |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProviderErrorKind {
    /// Credentials for the provider are not configured.
    NotConfigured,
    /// The request itself was rejected as malformed (e.g. bad postal code).
    InvalidInput,
    /// The provider has no data for the request.
    NotFound,
    /// Invalid credentials or plan restrictions.
    Unauthorized,
    /// The provider throttled the request (HTTP 429 or equivalent status).
    RateLimited,
    /// The request did not complete in time.
    Timeout,
    /// Any other non-success answer from the provider.
    Upstream,
    /// The provider answered with a body we could not interpret.
    Malformed,
    /// Connection-level failure.
    Network,
}

impl ProviderErrorKind {
    pub fn is_request_scoped(&self) -> bool {
        matches!(self, Self::InvalidInput | Self::NotFound)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::RateLimited => "rate_limited",
            Self::Timeout => "timeout",
            Self::Upstream => "upstream",
            Self::Malformed => "malformed",
            Self::Network => "network",
        }
    }
}

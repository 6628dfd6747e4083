use thiserror::Error;

/// Failures raised by data providers (network, timeout, malformed payloads).
///
/// The engine never retries these itself; retry/backoff policy belongs to the
/// provider implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP-level failure (connect error, non-success status).
    #[error("http error: {0}")]
    Http(String),

    /// The provider did not answer in time.
    #[error("provider timed out")]
    Timeout,

    /// The provider answered, but the payload could not be interpreted.
    #[error("malformed provider data: {0}")]
    MalformedData(String),

    /// The requested entity is unknown to the provider.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors surfaced by the engine's public operations.
///
/// Insufficient data is not represented here: sparse inputs produce degraded
/// results (zero forecasts, stable/zero-confidence trends) so that aggregate
/// analysis stays available.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller passed an invalid combination of arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A provider call failed; the orchestrator catches this at the leaf
    /// boundary and substitutes a safe default.
    #[error("data unavailable: {0}")]
    DataUnavailable(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display() {
        let err = ProviderError::Http("status 503".to_string());
        assert_eq!(err.to_string(), "http error: status 503");
    }

    #[test]
    fn engine_error_wraps_provider_error() {
        let err: EngineError = ProviderError::Timeout.into();
        assert!(matches!(err, EngineError::DataUnavailable(_)));
        assert_eq!(err.to_string(), "data unavailable: provider timed out");
    }

    #[test]
    fn invalid_argument_display() {
        let err = EngineError::InvalidArgument("exactly one id required".to_string());
        assert_eq!(
            err.to_string(),
            "invalid argument: exactly one id required"
        );
    }
}

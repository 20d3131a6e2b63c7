use thiserror::Error;

/// Failure of a single outbound call.
///
/// These never escape the core as fatal errors: the source selector turns
/// them into state transitions and only [`ExhaustedSources`] reaches the
/// caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection or timeout failure before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status code.
    #[error("{provider} request failed with status {status}: {body}")]
    Provider {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The response body could not be parsed into the expected shape.
    #[error("malformed {provider} response: {detail}")]
    Malformed {
        provider: &'static str,
        detail: String,
    },

    /// Geocoding produced no usable match for the given city.
    #[error("no geocoding match for '{0}'")]
    NotFound(String),

    /// No API key is configured for the primary provider.
    #[error("no API key configured for the primary provider")]
    NoCredential,
}

/// Terminal outcome when both the primary and the fallback path failed.
///
/// This is the single externally visible error of the core; rendering must
/// not proceed past it.
#[derive(Debug, Error)]
#[error("no weather source could provide data for '{target}'")]
pub struct ExhaustedSources {
    pub target: String,
}

use thiserror::Error;

/// Why a remote fetch produced nothing. Never leaves the content module;
/// callers only see `None` and fall back to the static bank.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned response code {0}")]
    ResponseCode(u8),

    #[error("Upstream returned no usable prompt")]
    EmptyPayload,
}

use shared::error::ProtocolError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("field `{name}` ({label}) is required")]
    MissingRequiredField { name: String, label: String },
    #[error("no field named `{0}` in the current form")]
    UnknownField(String),
}

/// Anything that kept a submission from producing a well-formed answer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("solve request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("solve response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("malformed solve response: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("solve service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid solver server url `{url}`: {source}")]
    InvalidServerUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("unknown stale response policy `{0}` (expected `latest_request` or `last_arrival`)")]
    InvalidStalePolicy(String),
}

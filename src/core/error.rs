//! Tagged failures of the conversion flow

use thiserror::Error;

/// Failure of a single call to the currency data service.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Network(String),

    #[error("HTTP error: {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Malformed response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },
}

// The request URL carries the api key, so it never reaches the message.
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.without_url().to_string())
    }
}

/// Failure of a conversion request, kept apart by kind so the
/// presentation layer can word each one.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub const INVALID_INPUT_MESSAGE: &str = "ERROR: invalid currency or number.";
pub const UNREACHABLE_MESSAGE: &str = "ERROR: could not reach the currency service.";
pub const MALFORMED_MESSAGE: &str = "ERROR: unexpected response from the currency service.";

impl ConversionError {
    /// Text shown in place of the result label.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConversionError::InvalidAmount(_) | ConversionError::UnknownCurrency(_) => {
                INVALID_INPUT_MESSAGE
            }
            ConversionError::Fetch(FetchError::Network(_) | FetchError::Status { .. }) => {
                UNREACHABLE_MESSAGE
            }
            ConversionError::Fetch(FetchError::Malformed { .. }) => MALFORMED_MESSAGE,
        }
    }
}

use async_trait::async_trait;

use crate::reading::Reading;

/// Anything the monitor can poll for a fresh [`Reading`].
#[async_trait]
pub trait RealTimeSource {
    /// Make exactly one attempt to fetch a fresh reading.
    ///
    /// Retrying is the scheduler's business, not the source's.
    async fn fetch(&self) -> Result<Reading, FetchError>;
}

/// Why a single fetch attempt failed.
///
/// None of these is fatal to the polling loop: the next tick makes an
/// independent attempt.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The endpoint could not be reached, or did not answer within the timeout.
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// The endpoint answered, but not with the contract we expect.
    #[error("malformed response: {0}")]
    Protocol(String),

    /// A well-formed response in which the cloud itself reports failure.
    #[error("cloud reported an error: {0}")]
    Vendor(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_status() || error.is_decode() {
            Self::Protocol(error.to_string())
        } else {
            Self::Network(error)
        }
    }
}

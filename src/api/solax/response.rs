use serde::Deserialize;

use crate::api::source::FetchError;

/// Generic SolaX Cloud response envelope.
///
/// The v1 API reports its error message under `exception`, the v2 API under
/// `info`.
#[derive(Deserialize)]
pub struct Response<R> {
    success: bool,

    #[serde(rename = "exception", alias = "info")]
    message: Option<String>,

    result: Option<R>,
}

impl<R> From<Response<R>> for Result<R, FetchError> {
    fn from(response: Response<R>) -> Self {
        if response.success {
            response.result.ok_or_else(|| {
                FetchError::Protocol("`result` is missing from a successful response".to_string())
            })
        } else {
            Err(FetchError::Vendor(
                response.message.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

//! API client errors.

use thiserror::Error;

/// Errors from talking to the ordering backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport or body decoding failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, carrying the server-provided message when the
    /// body had one.
    #[error("{message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Server message, or the status line when absent.
        message: String,
    },

    /// 401 response; the stored token has already been invalidated.
    #[error("session expired, please sign in again")]
    Unauthorized,
}

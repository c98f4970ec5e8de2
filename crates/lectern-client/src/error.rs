//! Client-side error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from backend API calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("server returned {status}: {detail}")]
    Server { status: StatusCode, detail: String },

    /// A local file for upload could not be read.
    #[error("could not read upload: {0}")]
    Upload(#[from] std::io::Error),
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::upload::UploadError;

pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required.";
pub const UPLOAD_FAILED_MESSAGE: &str = "An unknown error occurred during file upload.";
pub const INTERNAL_ERROR_MESSAGE: &str =
    "An internal server error occurred. Please try again later.";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("File upload error: {0}")]
    Upload(#[from] UploadError),
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    #[error("All fields are required.")]
    MissingFields,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upload(err) if !err.is_client_error() => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upload(_) | ApiError::MalformedBody(_) | ApiError::MissingFields => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text sent to the client. Server-side failures never leak details.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Upload(err) if !err.is_client_error() => UPLOAD_FAILED_MESSAGE.to_string(),
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            ApiError::MissingFields => MISSING_FIELDS_MESSAGE.to_string(),
            error => error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Internal(err) => {
                error!("Internal error: {err:#}");
            }

            ApiError::Upload(err) if !err.is_client_error() => {
                error!("Upload failed: {err}");
            }

            error => {
                warn!("Rejected submission: {error}");
            }
        }

        let body = ErrorBody {
            error: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

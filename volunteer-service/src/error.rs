use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use thiserror::Error;
use volunteer_network_shared::models::MessageResponse;
use volunteer_network_shared::store::StoreError;

use crate::upload::UploadError;

/// Body message for every server-side failure; details only go to the log
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl AppError {
    pub fn bad_request(message: String) -> Self {
        AppError::BadRequest(message)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upload(e) => e.status(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            warn!("Rejected request: {}", self);
            self.to_string()
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

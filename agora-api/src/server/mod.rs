use crate::uploads::{UploadError, UploadStore};
use agora_common::model::{Id, post::PostMarker, vote::InvalidVoteTypeError};
use agora_db::client::{DbClient, DbError};
use axum::{
    Router,
    extract::{
        DefaultBodyLimit, FromRef, Request,
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use json::Json;
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};
use thiserror::Error;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::error;

mod json;
mod routes;
#[cfg(test)]
mod tests;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub db_client: Arc<DbClient>,
    pub uploads: Arc<UploadStore>,
}

/// The `/api` routes plus static files from `public_dir` for everything else.
pub fn app(state: ServerState, public_dir: &Path, upload_limit_bytes: usize) -> Router {
    let api = routes::routes()
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(upload_limit_bytes));

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error("Incoming multipart body rejected: {0}")]
    MultipartRejection(#[from] MultipartRejection),
    #[error("Reading multipart body failed: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Please upload a file.")]
    MissingUpload,
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    InvalidVoteType(#[from] InvalidVoteTypeError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Post with id {0} was not found.")]
    PostByIdNotFound(Id<PostMarker>),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::PostByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Multipart(err) => err.status(),
            ServerError::JsonRejection(_)
            | ServerError::MultipartRejection(_)
            | ServerError::MissingUpload
            | ServerError::InvalidVoteType(_) => StatusCode::BAD_REQUEST,
            ServerError::JsonResponse(_) | ServerError::Upload(_) | ServerError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ErrorDetail {
    Error(String),
    Message(String),
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
struct ErrorResponse {
    status: u16,
    #[serde(flatten)]
    detail: ErrorDetail,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let detail = if matches!(self, ServerError::MissingUpload) {
            ErrorDetail::Message(self.to_string())
        } else {
            ErrorDetail::Error(self.to_string())
        };
        let error_response = ErrorResponse {
            status: status.as_u16(),
            detail,
        };
        (status, Json(error_response)).into_response()
    }
}

use crate::server::ServerError;
use axum::{
    Json as AxumJson,
    extract::FromRequest,
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use headers::ContentType;
use serde::Serialize;

#[derive(FromRequest, Debug, Clone, Copy, Default)]
#[from_request(via(AxumJson), rejection(ServerError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(json) => (TypedHeader(ContentType::json()), json).into_response(),
            Err(err) => ServerError::JsonResponse(err).into_response(),
        }
    }
}

pub const SUCCESS_MESSAGE: &str = "success";

/// Body of every successful API response: `{"message": "success", "data": ...}`.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct Success<T> {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T> Success<T> {
    #[must_use]
    pub fn new(data: T) -> Json<Self> {
        Json(Self {
            message: SUCCESS_MESSAGE,
            data: Some(data),
        })
    }
}

impl Success<()> {
    #[must_use]
    pub fn empty() -> Json<Self> {
        Json(Self {
            message: SUCCESS_MESSAGE,
            data: None,
        })
    }
}

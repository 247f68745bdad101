use crate::{
    server::{Result, ServerError, ServerRouter, json::Json},
    uploads::UploadStore,
};
use axum::extract::{Multipart, State, multipart::MultipartRejection};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Serialize;
use std::sync::Arc;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_post(upload_image)
}

#[derive(TypedPath)]
#[typed_path("/upload")]
struct UploadPath;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadedImage {
    image_url: String,
}

/// Stores the first `image` file field. Other fields are skipped.
async fn upload_image(
    _: UploadPath,
    State(uploads): State<Arc<UploadStore>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadedImage>> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };

        let name = uploads.store(&file_name, field).await?;
        return Ok(Json(UploadedImage {
            image_url: name.url(),
        }));
    }

    Err(ServerError::MissingUpload)
}

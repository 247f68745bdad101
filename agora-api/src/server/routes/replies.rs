use crate::server::{
    Result, ServerError, ServerRouter,
    json::{Json, Success},
};
use agora_common::model::{
    Id,
    post::PostMarker,
    reply::{Reply, ReplyContent},
};
use agora_db::client::DbClient;
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_replies)
        .typed_post(create_reply)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/replies", rejection(ServerError))]
struct RepliesPath {
    id: Id<PostMarker>,
}

async fn list_replies(
    RepliesPath { id }: RepliesPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Success<Vec<Reply>>>> {
    let replies = db.fetch_replies(id).await?;

    Ok(Success::new(replies))
}

async fn create_reply(
    RepliesPath { id }: RepliesPath,
    State(db): State<Arc<DbClient>>,
    Json(reply): Json<ReplyContent>,
) -> Result<Json<Success<Reply>>> {
    let reply = db
        .create_reply(id, &reply)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Success::new(reply))
}

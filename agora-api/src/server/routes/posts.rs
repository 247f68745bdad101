use crate::server::{
    Result, ServerError, ServerRouter,
    json::{Json, Success},
};
use agora_common::model::{
    Id,
    post::{Post, PostContent, PostMarker},
    vote::{VoteRequest, VoteType},
};
use agora_db::client::DbClient;
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_post(create_post)
        .typed_get(get_post)
        .typed_post(vote_post)
}

#[derive(TypedPath)]
#[typed_path("/posts")]
struct PostsPath;

async fn list_posts(
    _: PostsPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Success<Vec<Post>>>> {
    let posts = db.fetch_posts().await?;

    Ok(Success::new(posts))
}

async fn create_post(
    _: PostsPath,
    State(db): State<Arc<DbClient>>,
    Json(post): Json<PostContent>,
) -> Result<Json<Success<Post>>> {
    let post = db.create_post(&post).await?;

    Ok(Success::new(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct GetPostPath {
    id: Id<PostMarker>,
}

async fn get_post(
    GetPostPath { id }: GetPostPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Success<Post>>> {
    let post = db
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Success::new(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/vote", rejection(ServerError))]
struct VotePostPath {
    id: Id<PostMarker>,
}

async fn vote_post(
    VotePostPath { id }: VotePostPath,
    State(db): State<Arc<DbClient>>,
    Json(vote): Json<VoteRequest>,
) -> Result<Json<Success<()>>> {
    let vote_type = VoteType::try_from(&vote)?;

    let post = db
        .vote_post(id, vote_type)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;
    debug!(
        post_id = %id,
        %vote_type,
        upvotes = post.upvotes,
        downvotes = post.downvotes,
        "Counted vote"
    );

    Ok(Success::empty())
}

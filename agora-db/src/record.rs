use agora_common::model::{
    ModelValidationError, counter,
    post::{Post, PostContent},
    reply::Reply,
};
use sqlx::FromRow;
use time::PrimitiveDateTime;

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct PostRecord {
    pub id: i64,
    pub heading: Option<String>,
    pub content: Option<String>,
    pub hashtag: Option<String>,
    #[sqlx(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub upvotes: i64,
    pub downvotes: i64,
    #[sqlx(rename = "repliesCount")]
    pub replies_count: i64,
    pub timestamp: PrimitiveDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct ReplyRecord {
    pub id: i64,
    pub post_id: i64,
    pub content: Option<String>,
    pub timestamp: PrimitiveDateTime,
}

impl TryFrom<PostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.try_into()?,
            content: PostContent {
                heading: value.heading,
                content: value.content,
                hashtag: value.hashtag,
                image_url: value.image_url,
            },
            upvotes: counter("upvotes", value.upvotes)?,
            downvotes: counter("downvotes", value.downvotes)?,
            replies_count: counter("repliesCount", value.replies_count)?,
            timestamp: value.timestamp.assume_utc(),
        })
    }
}

impl TryFrom<ReplyRecord> for Reply {
    type Error = ModelValidationError;

    fn try_from(value: ReplyRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.try_into()?,
            post_id: value.post_id.try_into()?,
            content: value.content,
            timestamp: value.timestamp.assume_utc(),
        })
    }
}

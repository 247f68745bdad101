use crate::model::Id;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Id<PostMarker>,
    #[serde(flatten)]
    pub content: PostContent,
    pub upvotes: u64,
    pub downvotes: u64,
    pub replies_count: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Client supplied part of a post. Absent fields are stored as null.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostContent {
    pub heading: Option<String>,
    pub content: Option<String>,
    pub hashtag: Option<String>,
    pub image_url: Option<String>,
}

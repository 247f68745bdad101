use crate::{
    record::{PostRecord, ReplyRecord},
    schema,
};
use agora_common::model::{
    Id, ModelValidationError,
    post::{Post, PostContent, PostMarker},
    reply::{Reply, ReplyContent},
    vote::VoteType,
};
use sqlx::{
    SqlitePool, query, query_as,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Clone, Debug)]
pub struct DbClient {
    pool: SqlitePool,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `database_url` and ensures the
    /// schema exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let client = Self::new(pool);
        client.init_schema().await?;
        info!(database_url, "Database ready");

        Ok(client)
    }

    /// A private in-memory database. The pool holds exactly one connection that is
    /// never recycled, since the data lives only as long as that connection.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let client = Self::new(pool);
        client.init_schema().await?;

        Ok(client)
    }

    pub async fn init_schema(&self) -> Result<()> {
        let mut transaction = self.pool.begin().await?;
        for statement in [
            schema::CREATE_POSTS,
            schema::CREATE_REPLIES,
            schema::CREATE_REPLIES_POST_INDEX,
        ] {
            query(statement).execute(&mut *transaction).await?;
        }
        transaction.commit().await?;

        Ok(())
    }

    /// All posts, newest first. Posts created within the same second are ordered by id.
    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT
                id, heading, content, hashtag, imageUrl,
                upvotes, downvotes, repliesCount, timestamp
            FROM
                posts
            ORDER BY
                timestamp DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let posts: Vec<Post> = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<_, _>>()?;
        Ok(posts)
    }

    pub async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(
            "
            SELECT
                id, heading, content, hashtag, imageUrl,
                upvotes, downvotes, repliesCount, timestamp
            FROM
                posts
            WHERE
                id = ?
            ",
        )
        .bind(post_id.get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    pub async fn create_post(&self, post: &PostContent) -> Result<Post> {
        let record = query_as::<_, PostRecord>(
            "
            INSERT INTO posts (heading, content, hashtag, imageUrl)
            VALUES (?, ?, ?, ?)
            RETURNING
                id, heading, content, hashtag, imageUrl,
                upvotes, downvotes, repliesCount, timestamp
            ",
        )
        .bind(post.heading.as_deref())
        .bind(post.content.as_deref())
        .bind(post.hashtag.as_deref())
        .bind(post.image_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let post = Post::try_from(record)?;
        debug!(post_id = %post.id, "Created post");
        Ok(post)
    }

    /// Adds one vote in a single `UPDATE`, so concurrent votes are never lost.
    ///
    /// Returns the updated post, or `None` if no post has this id.
    pub async fn vote_post(
        &self,
        post_id: Id<PostMarker>,
        vote_type: VoteType,
    ) -> Result<Option<Post>> {
        let statement = match vote_type {
            VoteType::Upvote => {
                "
                UPDATE posts SET upvotes = upvotes + 1
                WHERE id = ?
                RETURNING
                    id, heading, content, hashtag, imageUrl,
                    upvotes, downvotes, repliesCount, timestamp
                "
            }
            VoteType::Downvote => {
                "
                UPDATE posts SET downvotes = downvotes + 1
                WHERE id = ?
                RETURNING
                    id, heading, content, hashtag, imageUrl,
                    upvotes, downvotes, repliesCount, timestamp
                "
            }
        };

        let record = query_as::<_, PostRecord>(statement)
            .bind(post_id.get().cast_signed())
            .fetch_optional(&self.pool)
            .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    /// Replies to a post, oldest first. An unknown post simply has no replies.
    pub async fn fetch_replies(&self, post_id: Id<PostMarker>) -> Result<Vec<Reply>> {
        let records = query_as::<_, ReplyRecord>(
            "
            SELECT
                id, post_id, content, timestamp
            FROM
                replies
            WHERE
                post_id = ?
            ORDER BY
                timestamp ASC, id ASC
            ",
        )
        .bind(post_id.get().cast_signed())
        .fetch_all(&self.pool)
        .await?;

        let replies: Vec<Reply> = records
            .into_iter()
            .map(Reply::try_from)
            .collect::<Result<_, _>>()?;
        Ok(replies)
    }

    /// Inserts a reply and bumps the post's `repliesCount` in one transaction.
    ///
    /// Returns `None` without writing anything if no post has this id.
    pub async fn create_reply(
        &self,
        post_id: Id<PostMarker>,
        reply: &ReplyContent,
    ) -> Result<Option<Reply>> {
        let mut transaction = self.pool.begin().await?;

        let updated = query("UPDATE posts SET repliesCount = repliesCount + 1 WHERE id = ?")
            .bind(post_id.get().cast_signed())
            .execute(&mut *transaction)
            .await?
            .rows_affected();

        if updated == 0 {
            transaction.rollback().await?;
            debug!(%post_id, "Reply rejected, post does not exist");
            return Ok(None);
        }

        let record = query_as::<_, ReplyRecord>(
            "
            INSERT INTO replies (post_id, content)
            VALUES (?, ?)
            RETURNING id, post_id, content, timestamp
            ",
        )
        .bind(post_id.get().cast_signed())
        .bind(reply.content.as_deref())
        .fetch_one(&mut *transaction)
        .await?;

        let reply = Reply::try_from(record)?;
        transaction.commit().await?;

        debug!(%post_id, reply_id = %reply.id, "Created reply");
        Ok(Some(reply))
    }
}

//! Table layout. Both statements are idempotent and run on every startup.

pub(crate) const CREATE_POSTS: &str = "
    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        heading TEXT,
        content TEXT,
        hashtag TEXT,
        imageUrl TEXT,
        upvotes INTEGER NOT NULL DEFAULT 0,
        downvotes INTEGER NOT NULL DEFAULT 0,
        repliesCount INTEGER NOT NULL DEFAULT 0,
        timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
";

pub(crate) const CREATE_REPLIES: &str = "
    CREATE TABLE IF NOT EXISTS replies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        post_id INTEGER NOT NULL,
        content TEXT,
        timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (post_id) REFERENCES posts (id)
    )
";

pub(crate) const CREATE_REPLIES_POST_INDEX: &str = "
    CREATE INDEX IF NOT EXISTS replies_post_id ON replies (post_id)
";

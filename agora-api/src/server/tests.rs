use crate::{
    server::{ServerState, app},
    uploads::UploadStore,
};
use agora_db::client::DbClient;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "agora-test-boundary";

struct TestApp {
    router: Router,
    _public_dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let public_dir = tempfile::tempdir().unwrap();
        let db_client = DbClient::in_memory().await.unwrap();
        let uploads = UploadStore::open(public_dir.path().join("uploads"))
            .await
            .unwrap();

        let state = ServerState {
            db_client: Arc::new(db_client),
            uploads: Arc::new(uploads),
        };
        let router = app(state, public_dir.path(), 1024 * 1024);

        Self {
            router,
            _public_dir: public_dir,
        }
    }

    async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, bytes)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(request).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn upload(&self, field_name: &str, file_name: &str, data: &[u8]) -> (StatusCode, Value) {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
            Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n\
            Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::post("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn create_post(&self, heading: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/posts",
                &json!({
                    "heading": heading,
                    "content": "World",
                    "hashtag": "#test",
                    "imageUrl": null,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"].clone()
    }
}

#[tokio::test]
async fn post_vote_reply_scenario() {
    let app = TestApp::new().await;

    let post = app.create_post("Hello").await;
    assert_eq!(post["id"], 1);
    assert_eq!(post["heading"], "Hello");
    assert_eq!(post["content"], "World");
    assert_eq!(post["hashtag"], "#test");
    assert_eq!(post["imageUrl"], Value::Null);
    assert_eq!(post["upvotes"], 0);
    assert_eq!(post["downvotes"], 0);
    assert_eq!(post["repliesCount"], 0);

    for vote_type in ["upvote", "upvote", "downvote"] {
        let (status, body) = app
            .post("/api/posts/1/vote", &json!({ "voteType": vote_type }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "success" }));
    }

    let (status, body) = app.get("/api/posts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
    assert_eq!(body["data"][0]["upvotes"], 2);
    assert_eq!(body["data"][0]["downvotes"], 1);

    let (status, body) = app
        .post("/api/posts/1/replies", &json!({ "content": "nice" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["post_id"], 1);
    assert_eq!(body["data"]["content"], "nice");

    let (status, body) = app.get("/api/posts/1/replies").await;
    assert_eq!(status, StatusCode::OK);
    let replies = body["data"].as_array().unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["content"], "nice");

    let (status, body) = app.get("/api/posts/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["repliesCount"], 1);
}

#[tokio::test]
async fn posts_are_listed_newest_first() {
    let app = TestApp::new().await;
    for heading in ["first", "second", "third"] {
        app.create_post(heading).await;
    }

    let (status, body) = app.get("/api/posts").await;

    assert_eq!(status, StatusCode::OK);
    let headings: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["heading"].as_str().unwrap())
        .collect();
    assert_eq!(headings, ["third", "second", "first"]);
}

#[tokio::test]
async fn create_post_accepts_missing_fields() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/posts", &json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["heading"], Value::Null);
    assert_eq!(body["data"]["content"], Value::Null);
}

#[tokio::test]
async fn invalid_vote_type_changes_nothing() {
    let app = TestApp::new().await;
    app.create_post("Hello").await;

    let (status, body) = app
        .post("/api/posts/1/vote", &json!({ "voteType": "sideways" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("sideways"));

    let (status, body) = app.post("/api/posts/1/vote", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, body) = app.get("/api/posts/1").await;
    assert_eq!(body["data"]["upvotes"], 0);
    assert_eq!(body["data"]["downvotes"], 0);
}

#[tokio::test]
async fn vote_on_unknown_post_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/api/posts/7/vote", &json!({ "voteType": "upvote" }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn replies_of_post_without_replies_are_empty() {
    let app = TestApp::new().await;
    app.create_post("Hello").await;

    let (status, body) = app.get("/api/posts/1/replies").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "success", "data": [] }));
}

#[tokio::test]
async fn reply_to_unknown_post_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post("/api/posts/3/replies", &json!({ "content": "hello?" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/posts/3/replies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn malformed_requests_are_rejected() {
    let app = TestApp::new().await;

    let request = Request::post("/api/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = app.get("/api/posts/abc/replies").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/nothing/here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn uploads_get_distinct_urls_and_are_served() {
    let app = TestApp::new().await;

    let (status, first) = app.upload("image", "photo.png", b"first image").await;
    assert_eq!(status, StatusCode::OK);
    let (status, second) = app.upload("image", "photo.png", b"second image").await;
    assert_eq!(status, StatusCode::OK);

    let first_url = first["imageUrl"].as_str().unwrap();
    let second_url = second["imageUrl"].as_str().unwrap();
    for url in [first_url, second_url] {
        let name = url.strip_prefix("/uploads/").unwrap();
        let (stem, extension) = name.split_once('.').unwrap();
        assert_eq!(extension, "png");
        assert!(
            stem.chars()
                .all(|c| c.is_ascii_hexdigit() || c == '-')
        );
    }
    assert_ne!(first_url, second_url);

    let request = Request::get(first_url).body(Body::empty()).unwrap();
    let (status, bytes) = app.send_raw(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&bytes[..], b"first image");

    let (status, post) = app
        .post(
            "/api/posts",
            &json!({ "heading": "pic", "imageUrl": second_url }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["data"]["imageUrl"], second_url);
}

#[tokio::test]
async fn upload_without_image_field_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.upload("avatar", "photo.png", b"data").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "status": 400, "message": "Please upload a file." })
    );
}

#[tokio::test]
async fn upload_without_multipart_body_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/upload", &json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use blog_api::{
    AppState, app,
    models::Post,
    store::{LocalStore, MemoryStore, POSTS_KEY, PostStore, StoreKind, SubscriberStore},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub remote: Arc<MemoryStore>,
    pub local: Arc<LocalStore>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new(remote_posts: Vec<Post>, local_posts: Vec<Post>) -> Self {
        Self::with_rate(remote_posts, local_posts, 1_000).await
    }

    pub async fn with_rate(remote_posts: Vec<Post>, local_posts: Vec<Post>, rate: u32) -> Self {
        let dir = TempDir::new().unwrap();
        let remote = Arc::new(MemoryStore::with_posts(StoreKind::Remote, remote_posts));
        let local = Arc::new(LocalStore::new(dir.path()));
        local.write_blob(POSTS_KEY, &local_posts).await.unwrap();

        let state = AppState::new(
            vec![remote.clone() as Arc<dyn PostStore>, local.clone()],
            vec![remote.clone() as Arc<dyn SubscriberStore>, local.clone()],
            rate,
            true,
        );

        Self {
            router: app(state),
            remote,
            local,
            _dir: dir,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

pub fn post(id: &str, date: &str, categories: &[&str], tags: &[&str]) -> Post {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Title of {id}"),
        "excerpt": format!("Excerpt of {id}"),
        "content": "<p>Some words in a paragraph.</p>",
        "author": "Sam Writer",
        "date": date,
        "categories": categories,
        "tags": tags,
        "image": format!("/images/{id}.jpg"),
    }))
    .unwrap()
}

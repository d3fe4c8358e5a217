#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use yatube_api::auth::create_token;
use yatube_api::cache::IndexCache;
use yatube_api::media::MediaStorage;
use yatube_api::{AppState, AppStateInner, router};
use yatube_db::Database;

pub const SECRET: &str = "test-secret";

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl Response {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION)?.to_str().ok()
    }
}

/// Router over an in-memory database and a throwaway media directory.
pub struct TestApp {
    pub state: AppState,
    app: Router,
    _media: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_index_cache(Duration::ZERO).await
    }

    pub async fn with_index_cache(ttl: Duration) -> Self {
        let media = tempfile::tempdir().expect("media dir");
        let state = Arc::new(AppStateInner {
            db: Database::open_in_memory().expect("in-memory db"),
            jwt_secret: SECRET.to_string(),
            media: MediaStorage::new(media.path().to_path_buf())
                .await
                .expect("media storage"),
            index_cache: IndexCache::new(ttl),
        });
        Self {
            app: router(state.clone()),
            state,
            _media: media,
        }
    }

    /// Create a user straight in the store and return a bearer token for it.
    pub fn user(&self, username: &str) -> String {
        let id = Uuid::new_v4();
        let created = self
            .state
            .db
            .create_user(&id.to_string(), username, "not-a-real-hash")
            .expect("create user");
        assert!(created, "username {username} already taken");
        create_token(SECRET, id, username).expect("token")
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        let response = self.app.clone().oneshot(request).await.expect("oneshot");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        Response {
            status,
            headers,
            json,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(request(Method::GET, uri, token).body(Body::empty()).expect("request"))
            .await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.send(
            request(Method::POST, uri, token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, token: Option<&str>, form: &str) -> Response {
        self.send(
            request(Method::POST, uri, token)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .expect("request"),
        )
        .await
    }

    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(request(Method::POST, uri, token).body(Body::empty()).expect("request"))
            .await
    }
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::TestApp;

async fn publish(app: &TestApp, token: &str, text: &str) -> i64 {
    let res = app.post_json("/create/", Some(token), json!({ "text": text })).await;
    assert_eq!(res.status, StatusCode::CREATED);
    res.json["id"].as_i64().expect("post id")
}

fn texts(page: &Value) -> Vec<&str> {
    page["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|p| p["text"].as_str().expect("text"))
        .collect()
}

#[tokio::test]
async fn index_is_newest_first_and_paginated() {
    let app = TestApp::new().await;
    let alice = app.user("alice");
    for i in 0..12 {
        publish(&app, &alice, &format!("post {i}")).await;
    }

    let res = app.get("/", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["count"], 12);
    assert_eq!(res.json["num_pages"], 2);
    assert_eq!(res.json["has_next"], true);
    assert_eq!(texts(&res.json).len(), 10);
    assert_eq!(texts(&res.json)[0], "post 11");

    let res = app.get("/?page=2", None).await;
    assert_eq!(texts(&res.json), ["post 1", "post 0"]);

    // Out of range falls back to the last page.
    let res = app.get("/?page=99", None).await;
    assert_eq!(res.json["number"], 2);
}

#[tokio::test]
async fn index_cache_serves_stale_page_until_cleared() {
    let app = TestApp::with_index_cache(Duration::from_secs(60)).await;
    let alice = app.user("alice");
    publish(&app, &alice, "first").await;

    let res = app.get("/", None).await;
    assert_eq!(texts(&res.json), ["first"]);

    publish(&app, &alice, "second").await;
    let res = app.get("/", None).await;
    assert_eq!(texts(&res.json), ["first"]);

    app.state.index_cache.clear().await;
    let res = app.get("/", None).await;
    assert_eq!(texts(&res.json), ["second", "first"]);
}

#[tokio::test]
async fn create_post_validation() {
    let app = TestApp::new().await;
    let alice = app.user("alice");

    let res = app.post_json("/create/", None, json!({ "text": "hi" })).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.post_json("/create/", Some(&alice), json!({ "text": "   " })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post_json("/create/", Some(&alice), json!({ "text": "hi", "group_id": 42 }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_author_edits_or_deletes() {
    let app = TestApp::new().await;
    let alice = app.user("alice");
    let bob = app.user("bob");
    let id = publish(&app, &alice, "original").await;

    let res = app
        .post_json(&format!("/posts/{id}/edit/"), Some(&bob), json!({ "text": "hijacked" }))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let res = app.post_empty(&format!("/posts/{id}/delete/"), Some(&bob)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .post_json(&format!("/posts/{id}/edit/"), Some(&alice), json!({ "text": "edited" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["text"], "edited");

    let res = app.post_empty(&format!("/posts/{id}/delete/"), Some(&alice)).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&format!("/posts/{id}/"), None).await.status, StatusCode::NOT_FOUND);
    let res = app.post_empty(&format!("/posts/{id}/delete/"), Some(&alice)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn groups_and_group_pages() {
    let app = TestApp::new().await;
    let alice = app.user("alice");

    let group = json!({ "title": "Rust", "slug": "rust", "description": "crabs" });
    let res = app.post_json("/groups/", Some(&alice), group.clone()).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let group_id = res.json["id"].as_i64().expect("group id");

    let res = app.post_json("/groups/", Some(&alice), group).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    let res = app
        .post_json("/groups/", None, json!({ "title": "X", "slug": "x", "description": "" }))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get("/groups/", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json[0]["slug"], "rust");

    app.post_json("/create/", Some(&alice), json!({ "text": "in group", "group_id": group_id }))
        .await;
    publish(&app, &alice, "no group").await;

    let res = app.get("/group/rust/", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["group"]["title"], "Rust");
    assert_eq!(texts(&res.json["posts"]), ["in group"]);
    assert_eq!(res.json["posts"]["items"][0]["group"]["slug"], "rust");

    assert_eq!(app.get("/group/nope/", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_on_post_detail() {
    let app = TestApp::new().await;
    let alice = app.user("alice");
    let bob = app.user("bob");
    let id = publish(&app, &alice, "discuss").await;

    let res = app
        .post_json(&format!("/posts/{id}/comment/"), Some(&bob), json!({ "text": "first!" }))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    let comment_id = res.json["id"].as_i64().expect("comment id");
    app.post_json(&format!("/posts/{id}/comment/"), Some(&alice), json!({ "text": "thanks" }))
        .await;

    let res = app
        .post_json("/posts/999/comment/", Some(&bob), json!({ "text": "lost" }))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get(&format!("/posts/{id}/"), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["author_post_count"], 1);
    assert_eq!(res.json["comments"][0]["text"], "first!");
    assert_eq!(res.json["comments"][1]["text"], "thanks");
    assert_eq!(res.json["comments"][0]["active"], true);

    let res = app
        .post_empty(&format!("/comments/{comment_id}/delete/"), Some(&alice))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let res = app
        .post_empty(&format!("/comments/{comment_id}/delete/"), Some(&bob))
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.get(&format!("/posts/{id}/"), None).await;
    assert_eq!(res.json["comments"].as_array().expect("comments").len(), 1);
}

#[tokio::test]
async fn like_and_dislike_toggle() {
    let app = TestApp::new().await;
    let alice = app.user("alice");
    let bob = app.user("bob");
    let id = publish(&app, &alice, "vote on me").await;

    let res = app.post_empty(&format!("/{id}/like/"), Some(&bob)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["liked"], true);
    assert_eq!(res.json["likes"], 1);

    // A dislike replaces the like.
    let res = app.post_empty(&format!("/{id}/dislike/"), Some(&bob)).await;
    assert_eq!(res.json["liked"], false);
    assert_eq!(res.json["disliked"], true);
    assert_eq!(res.json["likes"], 0);
    assert_eq!(res.json["dislikes"], 1);

    let res = app.post_empty(&format!("/{id}/dislike/"), Some(&bob)).await;
    assert_eq!(res.json["disliked"], false);
    assert_eq!(res.json["dislikes"], 0);

    app.post_empty(&format!("/{id}/like/"), Some(&alice)).await;
    let res = app.get(&format!("/posts/{id}/"), None).await;
    assert_eq!(res.json["post"]["likes"], 1);

    let res = app.post_empty("/999/like/", Some(&bob)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn follow_feed_and_author_page() {
    let app = TestApp::new().await;
    let alice = app.user("alice");
    let bob = app.user("bob");
    let carol = app.user("carol");
    publish(&app, &alice, "from alice").await;
    publish(&app, &carol, "from carol").await;

    let res = app.get("/follow/", Some(&bob)).await;
    assert_eq!(res.json["count"], 0);

    let res = app.post_empty("/profile/alice/follow/", Some(&bob)).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    app.post_empty("/profile/alice/follow/", Some(&bob)).await;
    app.post_empty("/profile/bob/follow/", Some(&bob)).await;

    let res = app.get("/follow/", Some(&bob)).await;
    assert_eq!(texts(&res.json), ["from alice"]);

    let res = app.get("/profile/alice/", Some(&bob)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["following"], true);
    assert_eq!(res.json["post_count"], 1);
    assert_eq!(res.json["author"]["user"]["username"], "alice");

    let res = app.get("/profile/alice/", None).await;
    assert_eq!(res.json["following"], false);

    app.post_empty("/profile/alice/unfollow/", Some(&bob)).await;
    let res = app.get("/follow/", Some(&bob)).await;
    assert_eq!(res.json["count"], 0);

    let res = app.post_empty("/profile/ghost/follow/", Some(&bob)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/profile/ghost/", None).await.status, StatusCode::NOT_FOUND);
}

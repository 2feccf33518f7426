//! End-to-end tests against the full router over the in-memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use bloglist::{Account, AppState, MemoryStore, Post, Repository, TokenService, build_router};

const SECRET: &str = "integration-test-secret";

struct TestApp {
    router: Router,
    repo: Arc<MemoryStore>,
}

impl TestApp {
    fn new() -> Self {
        let repo = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState::new(repo.clone(), TokenService::new(SECRET, None)));
        Self {
            router: build_router(state),
            repo,
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_string(&v).unwrap())
            }
            None => Body::empty(),
        };
        let resp = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, content_type, json)
    }

    async fn register(&self, username: &str, name: &str, password: &str) -> (StatusCode, Value) {
        let (s, _, body) = self
            .call(
                "POST",
                "/api/users",
                None,
                Some(json!({ "username": username, "name": name, "password": password })),
            )
            .await;
        (s, body)
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (s, _, body) = self
            .call(
                "POST",
                "/api/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(s, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    async fn blogs_in_db(&self) -> Vec<Post> {
        self.repo.list_posts().await.unwrap()
    }
}

/// Two accounts, two blogs owned by alice. Returns (app, alice_token, bob_token).
async fn seeded() -> (TestApp, String, String) {
    let app = TestApp::new();
    app.register("alice123", "Alice Johnson", "alicePassword").await;
    app.register("bob456", "Bob Smith", "bobSecure").await;
    let alice = app.login("alice123", "alicePassword").await;
    let bob = app.login("bob456", "bobSecure").await;

    for blog in [
        json!({ "title": "Favourite food", "author": "John Smith", "url": "http://something.com", "likes": 10 }),
        json!({ "title": "Music", "author": "Julia May", "url": "http://somethingelse.com", "likes": 3 }),
    ] {
        let (s, _, _) = app.call("POST", "/api/blogs", Some(&alice), Some(blog)).await;
        assert_eq!(s, StatusCode::CREATED);
    }
    (app, alice, bob)
}

// ── Listing ──

#[tokio::test]
async fn blogs_are_returned_as_json() {
    let (app, _, _) = seeded().await;
    let (s, ct, body) = app.call("GET", "/api/blogs", None, None).await;
    assert_eq!(s, StatusCode::OK);
    assert!(ct.unwrap().contains("application/json"));
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn listed_blogs_have_id_and_expanded_owner() {
    let (app, _, _) = seeded().await;
    let (_, _, body) = app.call("GET", "/api/blogs", None, None).await;
    for blog in body.as_array().unwrap() {
        let id = blog["id"].as_str().unwrap();
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
        assert!(blog.get("_id").is_none());
        assert_eq!(blog["user"]["username"], "alice123");
        assert_eq!(blog["user"]["name"], "Alice Johnson");
        assert!(blog["user"].get("password_hash").is_none());
    }
}

#[tokio::test]
async fn listing_ignores_a_stale_token() {
    let (app, _, _) = seeded().await;
    let (s, _, body) = app.call("GET", "/api/blogs", Some("stale"), None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

// ── Create ──

#[tokio::test]
async fn a_valid_blog_can_be_added() {
    let (app, alice, _) = seeded().await;
    let before = app.blogs_in_db().await.len();

    let (s, ct, body) = app
        .call(
            "POST",
            "/api/blogs",
            Some(&alice),
            Some(json!({ "title": "Travel", "author": "Liza Simpson", "url": "http://somethingelse.com", "likes": 30 })),
        )
        .await;
    assert_eq!(s, StatusCode::CREATED);
    assert!(ct.unwrap().contains("application/json"));

    let blogs = app.blogs_in_db().await;
    assert_eq!(blogs.len(), before + 1);
    assert!(blogs.iter().any(|b| b.author == "Liza Simpson"));

    let alice_id = app
        .repo
        .find_account_by_username("alice123")
        .await
        .unwrap()
        .unwrap()
        .id;
    assert_eq!(body["user"], alice_id);
}

#[tokio::test]
async fn created_blog_is_listed_exactly_once() {
    let (app, alice, _) = seeded().await;
    let (_, _, created) = app
        .call(
            "POST",
            "/api/blogs",
            Some(&alice),
            Some(json!({ "title": "Travel", "author": "Liza Simpson", "url": "http://travel.com" })),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (_, _, listed) = app.call("GET", "/api/blogs", None, None).await;
    let hits = listed
        .as_array()
        .unwrap()
        .iter()
        .filter(|b| b["id"] == id)
        .count();
    assert_eq!(hits, 1);
}

#[tokio::test]
async fn likes_default_to_zero_when_missing() {
    let (app, alice, _) = seeded().await;
    let (s, _, body) = app
        .call(
            "POST",
            "/api/blogs",
            Some(&alice),
            Some(json!({ "title": "Cooking", "author": "Kate Winston", "url": "http://bestcook.com" })),
        )
        .await;
    assert_eq!(s, StatusCode::CREATED);
    assert_eq!(body["likes"], 0);

    let stored = app.blogs_in_db().await;
    let cooking = stored.iter().find(|b| b.title == "Cooking").unwrap();
    assert_eq!(cooking.likes, 0);
}

#[tokio::test]
async fn blog_without_title_is_rejected() {
    let (app, alice, _) = seeded().await;
    let before = app.blogs_in_db().await.len();
    let (s, _, body) = app
        .call(
            "POST",
            "/api/blogs",
            Some(&alice),
            Some(json!({ "author": "Max Litt", "url": "http://maxlitt.com" })),
        )
        .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("title"));
    assert_eq!(app.blogs_in_db().await.len(), before);
}

#[tokio::test]
async fn blog_without_url_is_rejected() {
    let (app, alice, _) = seeded().await;
    let before = app.blogs_in_db().await.len();
    let (s, _, _) = app
        .call(
            "POST",
            "/api/blogs",
            Some(&alice),
            Some(json!({ "title": "Cars", "author": "Max Litt" })),
        )
        .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(app.blogs_in_db().await.len(), before);
}

#[tokio::test]
async fn blog_without_token_is_unauthorized() {
    let (app, _, _) = seeded().await;
    let before = app.blogs_in_db().await.len();
    let (s, _, body) = app
        .call(
            "POST",
            "/api/blogs",
            None,
            Some(json!({ "title": "Travel", "author": "Liza Simpson", "url": "http://travel.com" })),
        )
        .await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
    assert_eq!(app.blogs_in_db().await.len(), before);
}

#[tokio::test]
async fn malformed_json_body_is_bad_request() {
    let (app, alice, _) = seeded().await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/blogs")
        .header(header::AUTHORIZATION, format!("Bearer {}", alice))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_appends_back_reference() {
    let (app, _, _) = seeded().await;
    let (_, _, users) = app.call("GET", "/api/users", None, None).await;
    let alice = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "alice123")
        .unwrap();
    let blogs = alice["blogs"].as_array().unwrap();
    assert_eq!(blogs.len(), 2);
    assert!(blogs[0]["title"].is_string());
    assert!(blogs[0]["url"].is_string());
    assert!(blogs[0]["author"].is_string());
}

// ── Delete ──

#[tokio::test]
async fn a_blog_can_be_deleted_by_its_creator() {
    let (app, alice, _) = seeded().await;
    let target = app.blogs_in_db().await[0].clone();

    let (s, _, body) = app
        .call("DELETE", &format!("/api/blogs/{}", target.id), Some(&alice), None)
        .await;
    assert_eq!(s, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let remaining = app.blogs_in_db().await;
    assert_eq!(remaining.len(), 1);
    assert!(remaining.iter().all(|b| b.id != target.id));
}

#[tokio::test]
async fn deleting_someone_elses_blog_is_rejected() {
    let (app, _, bob) = seeded().await;
    let target = app.blogs_in_db().await[0].clone();

    let (s, _, body) = app
        .call("DELETE", &format!("/api/blogs/{}", target.id), Some(&bob), None)
        .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(app.blogs_in_db().await.len(), 2);
}

#[tokio::test]
async fn deleting_unknown_id_is_not_found() {
    let (app, alice, _) = seeded().await;
    let (s, _, _) = app
        .call("DELETE", "/api/blogs/5e9f8f8f8f8f8f8f8f8f8f8f", Some(&alice), None)
        .await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_without_token_is_unauthorized() {
    let (app, _, _) = seeded().await;
    let target = app.blogs_in_db().await[0].clone();
    let (s, _, _) = app
        .call("DELETE", &format!("/api/blogs/{}", target.id), None, None)
        .await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);
    assert_eq!(app.blogs_in_db().await.len(), 2);
}

// ── Update ──

#[tokio::test]
async fn a_blog_can_be_updated() {
    let (app, _, _) = seeded().await;
    let target = app.blogs_in_db().await[0].clone();

    let (s, ct, body) = app
        .call(
            "PUT",
            &format!("/api/blogs/{}", target.id),
            None,
            Some(json!({ "title": "Favourite food", "author": "John Smith", "url": "http://something.com", "likes": 50 })),
        )
        .await;
    assert_eq!(s, StatusCode::OK);
    assert!(ct.unwrap().contains("application/json"));
    assert_eq!(body["likes"], 50);
    assert_eq!(app.blogs_in_db().await.len(), 2);
}

#[tokio::test]
async fn update_ignores_a_stale_token() {
    let (app, _, _) = seeded().await;
    let target = app.blogs_in_db().await[0].clone();

    let (s, _, body) = app
        .call(
            "PUT",
            &format!("/api/blogs/{}", target.id),
            Some("stale"),
            Some(json!({ "likes": 99 })),
        )
        .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["likes"], 99);
    assert_eq!(body["title"], target.title);
}

#[tokio::test]
async fn updating_unknown_id_is_not_found() {
    let (app, _, _) = seeded().await;
    let (s, _, _) = app
        .call(
            "PUT",
            "/api/blogs/5e9f8f8f8f8f8f8f8f8f8f8f",
            None,
            Some(json!({ "title": "Favourite food", "author": "John Smith", "url": "http://something.com", "likes": 50 })),
        )
        .await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

// ── Users & login ──

#[tokio::test]
async fn register_login_and_create() {
    let app = TestApp::new();
    let (s, body) = app
        .register("alice123", "Alice Johnson", "alicePassword")
        .await;
    assert_eq!(s, StatusCode::CREATED);
    assert_eq!(body["username"], "alice123");
    assert_eq!(body["blogs"], json!([]));
    assert!(body.get("password_hash").is_none());
    assert!(body.get("passwordHash").is_none());

    let (s, _, login) = app
        .call(
            "POST",
            "/api/login",
            None,
            Some(json!({ "username": "alice123", "password": "alicePassword" })),
        )
        .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(login["username"], "alice123");
    assert_eq!(login["name"], "Alice Johnson");
    let token = login["token"].as_str().unwrap();

    let before = app.blogs_in_db().await.len();
    let (s, _, _) = app
        .call(
            "POST",
            "/api/blogs",
            Some(token),
            Some(json!({ "title": "Travel", "author": "Liza Simpson", "url": "http://travel.com" })),
        )
        .await;
    assert_eq!(s, StatusCode::CREATED);
    assert_eq!(app.blogs_in_db().await.len(), before + 1);
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = TestApp::new();
    let (s, body) = app.register("carol789", "Carol", "ab").await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password must be at least 3 characters long");
    assert!(app.repo.list_accounts().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = TestApp::new();
    app.register("alice123", "Alice Johnson", "alicePassword").await;
    let (s, body) = app.register("alice123", "Other Alice", "another").await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("unique"));
    assert_eq!(app.repo.list_accounts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn login_with_bad_credentials_is_unauthorized() {
    let app = TestApp::new();
    app.register("alice123", "Alice Johnson", "alicePassword").await;

    let (s, _, wrong) = app
        .call(
            "POST",
            "/api/login",
            None,
            Some(json!({ "username": "alice123", "password": "nope" })),
        )
        .await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);

    let (s, _, unknown) = app
        .call(
            "POST",
            "/api/login",
            None,
            Some(json!({ "username": "nobody", "password": "alicePassword" })),
        )
        .await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["error"], unknown["error"]);
}

#[tokio::test]
async fn token_for_another_secret_is_rejected() {
    let (app, _, _) = seeded().await;
    let account = app
        .repo
        .find_account_by_username("alice123")
        .await
        .unwrap()
        .unwrap();
    let forged = TokenService::new("some-other-secret", None)
        .issue(&account)
        .unwrap();
    let (s, _, _) = app
        .call(
            "POST",
            "/api/blogs",
            Some(&forged),
            Some(json!({ "title": "Travel", "author": "Liza Simpson", "url": "http://travel.com" })),
        )
        .await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_unknown_account_is_rejected() {
    let (app, _, _) = seeded().await;
    let before = app.blogs_in_db().await.len();

    let ghost = Account {
        id: "0f0f0f0f-0000-4000-8000-000000000000".to_string(),
        username: "ghost".to_string(),
        name: "Never Registered".to_string(),
        password_hash: String::new(),
        blogs: Vec::new(),
    };
    let token = TokenService::new(SECRET, None).issue(&ghost).unwrap();

    let (s, _, body) = app
        .call(
            "POST",
            "/api/blogs",
            Some(&token),
            Some(json!({ "title": "Travel", "author": "Liza Simpson", "url": "http://travel.com" })),
        )
        .await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "token invalid" }));
    assert_eq!(app.blogs_in_db().await.len(), before);
}

// ── Misc ──

#[tokio::test]
async fn health_and_unknown_endpoint() {
    let app = TestApp::new();
    let (s, _, body) = app.call("GET", "/api/health", None, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (s, _, body) = app.call("GET", "/api/nothing-here", None, None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown endpoint");
}

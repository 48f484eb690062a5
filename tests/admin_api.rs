use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt; // oneshot

use folio::config::SiteConfig;
use folio::Folio;

const PASSWORD: &str = "correct horse";

// === Build app like main ===
fn build_app(tmp: &TempDir, cms: bool) -> (Folio, Router) {
    let mut config = SiteConfig::default();
    config.admin.password = PASSWORD.to_string();
    config.cms.enabled = cms;
    let folio = Folio::with_config(tmp.path().to_path_buf(), config);
    let app = folio::server::router(&folio);
    (folio, app)
}

// === Small IO helpers ===
async fn read(resp: Response) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    read(resp).await
}

async fn login(app: &Router) -> String {
    let req = Request::post("/api/auth")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "password": PASSWORD }).to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_string()
}

fn write_post(dir: &Path, slug: &str, status: &str, date: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(format!("{slug}.mdx")),
        format!("---\ntitle: {slug}\nstatus: {status}\npublishedAt: {date}\ntags: [Rust]\n---\nBody\n"),
    )
    .unwrap();
}

// ===================== TESTS =====================

#[tokio::test]
async fn admin_routes_require_a_session() {
    let tmp = TempDir::new().unwrap();
    let (_, app) = build_app(&tmp, false);

    let (status, body) = send(&app, "GET", "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthorized");

    let (status, _) = send(
        &app,
        "POST",
        "/api/posts",
        Some("admin-session=made-up"),
        Some(json!({ "slug": "x", "title": "X", "content": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!tmp.path().join("content/blog/x.mdx").exists());

    let (status, _) = send(&app, "DELETE", "/api/posts/x", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_bad_passwords() {
    let tmp = TempDir::new().unwrap();
    let (_, app) = build_app(&tmp, false);

    let (status, _) = send(&app, "POST", "/api/auth", None, Some(json!({ "password": "nope" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "POST", "/api/auth", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password is required");
}

#[tokio::test]
async fn post_lifecycle() {
    let tmp = TempDir::new().unwrap();
    let (folio, app) = build_app(&tmp, false);
    let cookie = login(&app).await;
    let cookie = Some(cookie.as_str());

    let new_post = json!({
        "slug": "hello",
        "title": "Hello",
        "content": "First words.",
        "tags": ["intro"],
        "publishedAt": "2024-01-01",
        "status": "published"
    });
    let (status, body) = send(&app, "POST", "/api/posts", cookie, Some(new_post.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slug"], "hello");

    let (status, body) = send(&app, "POST", "/api/posts", cookie, Some(new_post)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");

    let (status, body) = send(&app, "GET", "/api/posts/hello", cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Hello");
    assert_eq!(body["post"]["content"], "First words.");
    assert_eq!(body["post"]["readingTime"], "");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/posts/hello",
        cookie,
        Some(json!({ "title": "Hello again", "content": "Edited.", "status": "draft" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let post = folio.resolver().post("hello").unwrap();
    assert_eq!(post.title, "Hello again");
    assert!(post.tags.is_empty());
    assert!(!post.is_published());

    let (status, body) = send(&app, "GET", "/api/posts", cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", "/api/posts/hello", cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!folio.content_dir.join("hello.mdx").exists());

    let (status, body) = send(&app, "DELETE", "/api/posts/hello", cookie, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn write_errors_map_to_statuses() {
    let tmp = TempDir::new().unwrap();
    let (folio, app) = build_app(&tmp, false);
    let cookie = login(&app).await;
    let cookie = Some(cookie.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/api/posts",
        cookie,
        Some(json!({ "title": "No slug", "content": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/posts/ghost",
        cookie,
        Some(json!({ "title": "Ghost", "content": "boo" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!folio.content_dir.join("ghost.mdx").exists());

    let (status, _) = send(&app, "GET", "/api/posts/ghost", cookie, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/posts",
        cookie,
        Some(json!({ "slug": "x", "title": "X", "content": "x", "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let tmp = TempDir::new().unwrap();
    let (_, app) = build_app(&tmp, false);
    let cookie = login(&app).await;

    let (status, _) = send(&app, "GET", "/api/posts", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", "/api/auth", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/posts", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_routes_hide_drafts() {
    let tmp = TempDir::new().unwrap();
    let (folio, app) = build_app(&tmp, false);
    write_post(&folio.content_dir, "a", "published", "2024-01-01");
    write_post(&folio.content_dir, "b", "draft", "2024-02-01");

    let (status, body) = send(&app, "GET", "/api/public/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<_> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, vec!["a"]);

    let (status, _) = send(&app, "GET", "/api/public/posts/b", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/public/tags", None, None).await;
    assert_eq!(body["tags"], json!(["Rust"]));

    let (_, body) = send(&app, "GET", "/api/public/tags/rust", None, None).await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn cms_checkout_takes_priority() {
    let tmp = TempDir::new().unwrap();
    let (folio, app) = build_app(&tmp, true);
    write_post(&folio.content_dir, "local", "published", "2024-01-01");

    for (slug, date) in [("cms-one", "2024-03-01"), ("cms-two", "2024-04-01")] {
        let entry = folio.cms_dir.join("posts").join(slug);
        fs::create_dir_all(&entry).unwrap();
        fs::write(
            entry.join("index.yaml"),
            format!("title: {slug}\nstatus: published\npublishedAt: {date}\n"),
        )
        .unwrap();
        fs::write(entry.join("content.mdx"), "From the CMS").unwrap();
    }
    fs::write(
        folio.cms_dir.join("site.json"),
        r#"{"title":"CMS Site","author":"Jane"}"#,
    )
    .unwrap();

    let (_, body) = send(&app, "GET", "/api/public/posts", None, None).await;
    let slugs: Vec<_> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, vec!["cms-two", "cms-one"]);

    let (_, body) = send(&app, "GET", "/api/site", None, None).await;
    assert_eq!(body["title"], "CMS Site");
}

#[tokio::test]
async fn admin_routes_read_the_directory_they_write() {
    let tmp = TempDir::new().unwrap();
    let (folio, app) = build_app(&tmp, true);

    let entry = folio.cms_dir.join("posts/cms-post");
    fs::create_dir_all(&entry).unwrap();
    fs::write(entry.join("index.yaml"), "title: From CMS\nstatus: published\n").unwrap();

    let cookie = login(&app).await;
    let cookie = Some(cookie.as_str());

    let (status, _) = send(
        &app,
        "POST",
        "/api/posts",
        cookie,
        Some(json!({ "slug": "mine", "title": "Mine", "content": "Local." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/api/posts", cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<_> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, vec!["mine"]);

    let (status, body) = send(&app, "GET", "/api/posts/mine", cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["content"], "Local.");

    let (status, _) = send(&app, "GET", "/api/posts/cms-post", cookie, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/public/posts", None, None).await;
    assert_eq!(body["posts"][0]["slug"], "cms-post");

    let (status, _) = send(&app, "DELETE", "/api/posts/mine", cookie, None).await;
    assert_eq!(status, StatusCode::OK);
}

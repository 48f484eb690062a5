//! Admin and public content API

mod api;
pub mod auth;
mod error;

use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::content::{FilesystemSource, PostResolver, PostWriter};
use crate::Folio;
use auth::{AdminPassword, SessionStore};

pub use error::ApiError;

/// Session cookie settings
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

/// Server state
pub struct AppState {
    /// Public reads, CMS first
    pub resolver: PostResolver,
    /// Admin reads, the same directory `writer` writes to
    pub posts: FilesystemSource,
    pub writer: PostWriter,
    pub password: AdminPassword,
    pub sessions: SessionStore,
    pub cookie: CookieSettings,
}

impl AppState {
    pub fn new(folio: &Folio) -> Self {
        let admin = &folio.config.admin;
        Self {
            resolver: folio.resolver(),
            posts: FilesystemSource::new(&folio.content_dir),
            writer: folio.writer(),
            password: AdminPassword::new(&admin.password),
            sessions: SessionStore::new(Duration::from_secs(admin.session_max_age_secs)),
            cookie: CookieSettings {
                name: admin.cookie_name.clone(),
                secure: admin.secure_cookie,
            },
        }
    }
}

/// Build the application router
pub fn router(folio: &Folio) -> Router {
    let state = Arc::new(AppState::new(folio));

    let admin = Router::new()
        .route("/api/posts", get(api::list_posts).post(api::create_post))
        .route(
            "/api/posts/:slug",
            get(api::get_post)
                .put(api::update_post)
                .delete(api::delete_post),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let public = Router::new()
        .route("/api/public/posts", get(api::published_posts))
        .route("/api/public/posts/:slug", get(api::published_post))
        .route("/api/public/featured", get(api::featured_posts))
        .route("/api/public/tags", get(api::tags))
        .route("/api/public/tags/:tag", get(api::posts_by_tag))
        .route("/api/public/pages", get(api::pages))
        .route("/api/public/pages/:slug", get(api::page))
        .route("/api/site", get(api::site_settings));

    Router::new()
        .route("/api/auth", post(auth::login).delete(auth::logout))
        .merge(admin)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if folio.config.cms.enabled {
        println!("Reading posts from CMS checkout {:?}", folio.cms_dir);
        tracing::warn!(
            "Public routes hide posts in {:?} while the CMS checkout has posts; admin routes only see that directory",
            folio.content_dir
        );
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Post handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::content::{sort_by_date_desc, validate_slug, ContentError, PostInput, SiteSettings};

type ApiResult<T> = Result<T, ApiError>;

// ---------- admin ----------

/// GET /api/posts - every filesystem post, drafts included
#[tracing::instrument(skip_all)]
pub async fn list_posts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let mut posts = state.posts.read_all().map_err(ContentError::from)?;
    sort_by_date_desc(&mut posts);
    Ok(Json(json!({ "posts": posts })))
}

/// POST /api/posts
#[tracing::instrument(skip_all)]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(input) = payload?;
    let slug = state.writer.create(input)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Post created successfully", "slug": slug })),
    ))
}

/// GET /api/posts/:slug
#[tracing::instrument(skip(state))]
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Value>> {
    let post = validate_slug(&slug)
        .ok()
        .and_then(|_| state.posts.read_one(&slug))
        .ok_or(ContentError::NotFound(slug))?;
    Ok(Json(json!({ "post": post })))
}

/// PUT /api/posts/:slug
#[tracing::instrument(skip(state, payload))]
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = payload?;
    state.writer.update(&slug, input)?;
    Ok(Json(
        json!({ "success": true, "message": "Post updated successfully" }),
    ))
}

/// DELETE /api/posts/:slug
#[tracing::instrument(skip(state))]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Value>> {
    state.writer.delete(&slug)?;
    Ok(Json(
        json!({ "success": true, "message": "Post deleted successfully" }),
    ))
}

// ---------- public ----------

pub async fn published_posts(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "posts": state.resolver.published_posts() }))
}

pub async fn published_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Value>> {
    let post = state
        .resolver
        .published_post(&slug)
        .ok_or(ContentError::NotFound(slug))?;
    Ok(Json(json!({ "post": post })))
}

pub async fn featured_posts(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "posts": state.resolver.featured_posts() }))
}

pub async fn tags(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "tags": state.resolver.all_tags() }))
}

pub async fn posts_by_tag(
    State(state): State<Arc<AppState>>,
    Path(tag): Path<String>,
) -> Json<Value> {
    let posts = state.resolver.posts_by_tag(&tag);
    Json(json!({ "tag": tag, "posts": posts }))
}

pub async fn pages(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "pages": state.resolver.pages() }))
}

pub async fn page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Value>> {
    let page = state
        .resolver
        .page(&slug)
        .ok_or(ContentError::NotFound(slug))?;
    Ok(Json(json!({ "page": page })))
}

pub async fn site_settings(State(state): State<Arc<AppState>>) -> Json<SiteSettings> {
    Json(state.resolver.site_settings())
}

//! Single-password admin sessions

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use super::{ApiError, AppState};

/// The shared admin secret, kept only as a digest
pub struct AdminPassword {
    digest: [u8; 32],
}

impl AdminPassword {
    pub fn new(password: &str) -> Self {
        Self {
            digest: sha256(password),
        }
    }

    pub fn verify(&self, attempt: &str) -> bool {
        sha256(attempt)[..].ct_eq(&self.digest[..]).into()
    }
}

fn sha256(value: &str) -> [u8; 32] {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(value.as_bytes()));
    digest
}

/// Longest session lifetime honoured, ten years
const MAX_SESSION_AGE: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Issued session tokens and their expiry
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Instant>>,
    max_age: Duration,
}

impl SessionStore {
    pub fn new(max_age: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_age: max_age.min(MAX_SESSION_AGE),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Issue a new token
    pub fn create(&self) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.retain(|_, expires| *expires > now);
        sessions.insert(token.clone(), now + self.max_age);
        token
    }

    pub fn is_valid(&self, token: &str) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(token)
            .map(|expires| *expires > Instant::now())
            .unwrap_or(false)
    }

    pub fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(token);
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let Json(request) = payload?;

    if request.password.is_empty() {
        return Err(ApiError::BadRequest("Password is required".to_string()));
    }

    if !state.password.verify(&request.password) {
        tracing::warn!("Rejected admin login");
        return Err(ApiError::Unauthorized);
    }

    let token = state.sessions.create();
    let cookie = Cookie::build((state.cookie.name.clone(), token))
        .http_only(true)
        .secure(state.cookie.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(cookie_max_age(state.sessions.max_age()))
        .build();

    tracing::info!("Admin session created");
    Ok((
        jar.add(cookie),
        Json(json!({ "success": true, "message": "Authenticated successfully" })),
    ))
}

// Saturates instead of wrapping for huge configured lifetimes.
fn cookie_max_age(max_age: Duration) -> time::Duration {
    time::Duration::seconds(i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX))
}

/// DELETE /api/auth
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    if let Some(cookie) = jar.get(&state.cookie.name) {
        state.sessions.revoke(cookie.value());
    }

    let jar = jar.remove(Cookie::build((state.cookie.name.clone(), "")).path("/"));
    (
        jar,
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    )
}

/// Reject requests without a live session cookie
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let authenticated = jar
        .get(&state.cookie.name)
        .map(|cookie| state.sessions.is_valid(cookie.value()))
        .unwrap_or(false);

    if !authenticated {
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

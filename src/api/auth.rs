use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use crate::{
    error::{AppError, Result},
    state::AppState,
};

pub const LOGIN_PATH: &str = "/api/login";

/// The single admin secret, compared verbatim.
#[derive(Clone)]
pub struct AdminKey(Arc<str>);

impl AdminKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Arc::from(key.into()))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        *self.0 == *candidate
    }

    /// Requires `Authorization: Bearer <admin key>`.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<()> {
        match bearer_token(headers) {
            Some(token) if self.matches(token) => Ok(()),
            _ => Err(AppError::Unauthorized),
        }
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminKey(..)")
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Front door for every `/api/*` route: answers preflights, lets the login
/// call through and demands the bearer token everywhere else, unknown routes
/// included.
pub async fn api_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if request.method() == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }
    if request.method() == Method::POST && request.uri().path() == LOGIN_PATH {
        return Ok(next.run(request).await);
    }
    if let Err(e) = state.admin.authorize(request.headers()) {
        info!(path = %request.uri().path(), "Admin API authentication failed");
        return Err(e);
    }
    debug!(path = %request.uri().path(), "Admin API authentication succeeded");
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn matches_is_exact() {
        let key = AdminKey::new("s3cret");
        assert!(key.matches("s3cret"));
        assert!(!key.matches("s3cret "));
        assert!(!key.matches("S3CRET"));
        assert!(!key.matches(""));
    }

    #[test]
    fn bearer_token_is_accepted() {
        let key = AdminKey::new("s3cret");
        assert!(key.authorize(&headers("Bearer s3cret")).is_ok());
    }

    #[test]
    fn missing_or_wrong_token_is_rejected() {
        let key = AdminKey::new("s3cret");
        for value in ["Bearer wrong", "s3cret", "Basic s3cret", "Bearer "] {
            assert!(matches!(
                key.authorize(&headers(value)),
                Err(AppError::Unauthorized)
            ));
        }
        assert!(matches!(
            key.authorize(&HeaderMap::new()),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn debug_hides_secret() {
        assert_eq!(format!("{:?}", AdminKey::new("s3cret")), "AdminKey(..)");
    }
}

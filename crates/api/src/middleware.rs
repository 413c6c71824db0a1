use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use stockbook_store::Database;

use crate::context::TenantContext;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct AuthState {
    pub db: Arc<Database>,
}

/// Resolve the `x-api-key` header against the key table and stamp the
/// request with the key's tenant.
pub async fn api_key_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let key = extract_api_key(req.headers())?;

    let resolved = state
        .db
        .resolve_api_key(key)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut()
        .insert(TenantContext::new(resolved.tenant_id));

    Ok(next.run(req).await)
}

fn extract_api_key(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers.get(API_KEY_HEADER).ok_or(StatusCode::UNAUTHORIZED)?;
    let key = header
        .to_str()
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .trim();
    if key.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(key)
}

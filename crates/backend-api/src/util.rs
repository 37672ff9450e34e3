use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::ApiError;

pub fn require_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or("");
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(ApiError::unauthorized("Unauthorized"));
    }

    let token = parts.next().unwrap_or("");
    if token.is_empty() {
        return Err(ApiError::unauthorized("Unauthorized"));
    }

    Ok(token.to_string())
}

/// Bearer token if one was sent, for endpoints where a session is optional.
pub fn optional_bearer(headers: &HeaderMap) -> Option<String> {
    if !headers.contains_key(AUTHORIZATION) {
        return None;
    }
    require_bearer(headers).ok()
}

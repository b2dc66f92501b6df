//! Session cookie handling and the authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use fueltrack_core::SessionState;
use std::time::Duration;

use super::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "fueltrack_session";

/// Extracts the session token from the request's `Cookie` headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
}

/// `Set-Cookie` value that stores `token` for `ttl`.
pub fn session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl.as_secs()
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Authentication middleware
///
/// Anonymous requests are sent to the login page. Authenticated requests
/// carry their `Identity` in the request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(request.headers());

    match state.gate.session(token.as_deref()) {
        SessionState::Authenticated(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        SessionState::Anonymous => Redirect::to("/login").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; fueltrack_session=abc-123; lang=en"),
        );

        assert_eq!(session_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_session_token_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(header::COOKIE, HeaderValue::from_static("fueltrack_session=xyz"));

        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_session_token_missing() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("other_session=abc"),
        );
        assert!(session_token(&headers).is_none());
    }

    #[test]
    fn test_cookie_values() {
        let cookie = session_cookie("tok", Duration::from_secs(600));
        assert_eq!(
            cookie,
            "fueltrack_session=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=600"
        );

        assert!(expired_session_cookie().contains("Max-Age=0"));
    }
}

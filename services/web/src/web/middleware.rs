//! services/web/src/web/middleware.rs
//!
//! Session middleware that attaches a chat session to every request.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "study_session";

/// Middleware that resolves the session cookie to a `SessionHandle`.
///
/// The handle is inserted into request extensions for handlers to use.
/// A request without a usable cookie gets a new session id, and the cookie is
/// set on the response. Nothing is stored until a handler registers the session.
pub async fn with_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_id = session_id_from_cookies(req.headers().get(header::COOKIE));
    let handle = state.sessions.resolve(cookie_id).await;

    let new_session_id = handle.issue_cookie.then_some(handle.id);
    if let Some(id) = new_session_id {
        debug!("Issuing session cookie {}", id);
    }
    req.extensions_mut().insert(handle);

    let mut response = next.run(req).await;

    if let Some(id) = new_session_id {
        let cookie = format!("{SESSION_COOKIE}={id}; HttpOnly; SameSite=Lax; Path=/");
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => error!("Failed to build session cookie: {:?}", e),
        }
    }
    response
}

/// Extracts the session id from a `Cookie` header, if present and well formed.
fn session_id_from_cookies(cookie_header: Option<&HeaderValue>) -> Option<Uuid> {
    cookie_header
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| c.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .and_then(|id| Uuid::parse_str(id).ok())
}

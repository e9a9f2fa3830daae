//! Session middleware: resolves the `sid` cookie to a session id before the
//! handler runs, issuing a fresh signed cookie when none (or a forged one) is presented.
//! Minting an id stores nothing; the store keeps a session once it has a chat exchange.

use crate::AppState;
use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub(crate) const SESSION_COOKIE: &str = "sid";

/// Session id of the current request, inserted by [`session_layer`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionId(pub(crate) Uuid);

pub(crate) async fn session_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let presented = session_cookie(req.headers()).and_then(|token| state.signer.verify(token));
    let (id, issued) = match presented {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    };
    req.extensions_mut().insert(SessionId(id));

    let mut res = next.run(req).await;
    if issued {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            state.signer.sign(id)
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                res.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(session = %id, "could not encode session cookie: {}", e),
        }
    }
    res
}

/// Value of the session cookie, if the request carries one.
fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_sid_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; sid=abc.def; lang=rw"));
        assert_eq!(session_cookie(&headers), Some("abc.def"));
    }

    #[test]
    fn checks_every_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("sid=xyz"));
        assert_eq!(session_cookie(&headers), Some("xyz"));
    }

    #[test]
    fn absent_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("sidebar=open"));
        assert_eq!(session_cookie(&headers), None);
    }
}

use crate::error::PageError;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use plainplates_app::domain::{Caller, SessionUser};
use plainplates_app::AppContext;
use plainplates_errors::AppError;
use std::net::{IpAddr, SocketAddr};
use tower_sessions::Session;

pub const SESSION_USER_KEY: &str = "user";
pub const OAUTH_STATE_KEY: &str = "oauth_state";
pub const PKCE_VERIFIER_KEY: &str = "pkce_verifier";

/// The caller behind a request, plus the session it came with.
pub struct CurrentCaller {
    pub caller: Caller,
    pub session: Session,
}

impl CurrentCaller {
    pub fn user(&self) -> Option<&SessionUser> {
        self.caller.user.as_ref()
    }

    pub fn require_user(&self) -> Result<&SessionUser, AppError> {
        self.user().ok_or(AppError::Unauthenticated)
    }
}

impl FromRequestParts<AppContext> for CurrentCaller {
    type Rejection = PageError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(msg.to_string()))?;

        let user = session
            .get::<SessionUser>(SESSION_USER_KEY)
            .await
            .map_err(|e| AppError::Internal(format!("Session read failed: {}", e)))?;

        let caller = match user {
            Some(user) => Caller::authenticated(user),
            None => {
                let peer = parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip());
                match client_ip(&parts.headers, peer) {
                    Some(ip) => Caller::anonymous(ip),
                    None => Caller::anonymous("unknown"),
                }
            }
        };

        Ok(Self { caller, session })
    }
}

/// First `X-Forwarded-For` entry, else the TCP peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .or(peer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        let peer = Some("127.0.0.1".parse().unwrap());
        assert_eq!(
            client_ip(&headers, peer),
            Some("203.0.113.7".parse().unwrap())
        );
    }

    #[test]
    fn test_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        let peer = Some("192.0.2.1".parse().unwrap());
        assert_eq!(client_ip(&headers, peer), peer);
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }
}

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::routes::AppState;
use crate::session::SessionRegistry;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Checks the single shared password and hands out session tokens.
#[derive(Clone)]
pub struct AuthGate {
    password: String,
}

impl AuthGate {
    pub fn new(password: impl Into<String>) -> Self {
        Self { password: password.into() }
    }

    /// Exact, case-sensitive match against the shared password.
    pub fn authenticate(&self, password: &str, sessions: &SessionRegistry) -> Result<String, AuthError> {
        if password != self.password {
            warn!("rejected authentication attempt");
            return Err(AuthError::InvalidCredentials);
        }
        let token = sessions.issue();
        info!(active_sessions = sessions.len(), "issued session token");
        Ok(token)
    }
}

/// Pull the token out of an `Authorization` header value. A leading
/// `Bearer ` is stripped; otherwise the raw value is the token.
pub fn token_from_header(value: &str) -> &str {
    value.strip_prefix("Bearer ").unwrap_or(value)
}

/// Extractor for routes that need a valid session token.
#[derive(Debug, Clone)]
pub struct Session(pub String);

impl Session {
    fn extract(req: &HttpRequest) -> Result<Self, ApiError> {
        let state = req.app_data::<web::Data<AppState>>().ok_or(ApiError::Internal)?;
        let raw = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let token = token_from_header(raw);
        if token.is_empty() || !state.sessions.verify(token) {
            return Err(ApiError::Unauthorized);
        }
        Ok(Session(token.to_string()))
    }
}

impl FromRequest for Session {
    type Error = ApiError;
    type Future = Ready<Result<Self, ApiError>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}

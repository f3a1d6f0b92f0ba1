// ABOUTME: HTTP Basic authentication middleware
// ABOUTME: Compares the request's credentials to the configured pair in constant time

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose, Engine as _};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;

/// Realm advertised in the `WWW-Authenticate` challenge
pub const REALM: &str = "usertags";

/// The single client identity allowed to call the API
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Decode an `Authorization: Basic ...` header value into `(username, password)`
pub fn parse_basic_authorization(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}

/// Basic auth middleware for every versioned API route
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic_authorization);

    match provided {
        Some((username, password)) if state.credentials.verify(&username, &password) => {
            debug!(path = %path, "Basic credentials accepted");
            Ok(next.run(request).await)
        }
        Some((username, _)) => {
            warn!(path = %path, username = %username, "Invalid credentials");
            Err(AppError::Unauthorized)
        }
        None => {
            warn!(path = %path, "Missing or malformed Authorization header");
            Err(AppError::Unauthorized)
        }
    }
}

//! Bearer-token authentication for the HTTP transport.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashSet;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::warn;

/// Authentication configuration for the HTTP transport. Empty token set
/// means authentication is disabled.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    tokens: HashSet<String>,
}

impl AuthConfig {
    /// Build from configured tokens. Blank entries are rejected rather than
    /// silently accepted as a match-anything token.
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self, String> {
        let mut valid = HashSet::new();
        for token in tokens {
            let trimmed = token.trim();
            if trimmed.is_empty() {
                return Err("Empty token value in configuration".to_string());
            }
            valid.insert(trimmed.to_string());
        }
        Ok(Self { tokens: valid })
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    fn verify(&self, provided: &str) -> bool {
        let mut found = false;
        for expected in &self.tokens {
            if constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
                found = true;
            }
        }
        found
    }
}

/// Authentication middleware for HTTP requests.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthConfig>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Ok(Some(token)) => token,
        Ok(None) => {
            warn!("Authentication failed: missing Authorization header");
            return unauthorized("Missing Bearer token in Authorization header");
        }
        Err(msg) => {
            warn!("Authentication failed: invalid header format");
            return unauthorized(msg);
        }
    };

    if auth.verify(token) {
        next.run(request).await
    } else {
        warn!(token_prefix = %mask_token(token), "Authentication failed: invalid token");
        unauthorized("Invalid Bearer token")
    }
}

fn bearer_token(request: &Request<Body>) -> Result<Option<&str>, &'static str> {
    let Some(auth_header) = request.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Authorization header contains invalid characters")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Invalid Authorization header format. Expected 'Bearer <token>'")?;
    if token.is_empty() {
        return Err("Bearer token is empty");
    }

    Ok(Some(token))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

fn mask_token(token: &str) -> String {
    if token.len() <= 3 {
        "***".to_string()
    } else {
        format!("{}***", &token[..3])
    }
}

fn unauthorized(message: &str) -> Response {
    let body = serde_json::json!({
        "error": { "code": "unauthorized", "message": message }
    });
    (
        StatusCode::UNAUTHORIZED,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        assert!(!AuthConfig::disabled().is_enabled());
        assert!(!AuthConfig::from_tokens(Vec::new()).unwrap().is_enabled());
    }

    #[test]
    fn test_from_tokens_trims_and_counts() {
        let auth = AuthConfig::from_tokens(vec![" abc ".to_string(), "def".to_string()]).unwrap();
        assert!(auth.is_enabled());
        assert_eq!(auth.token_count(), 2);
        assert!(auth.verify("abc"));
        assert!(auth.verify("def"));
    }

    #[test]
    fn test_blank_token_rejected() {
        assert!(AuthConfig::from_tokens(vec!["  ".to_string()]).is_err());
    }

    #[test]
    fn test_verify_rejects_unknown_token() {
        let auth = AuthConfig::from_tokens(vec!["secret".to_string()]).unwrap();
        assert!(!auth.verify("wrong"));
        assert!(!auth.verify(""));
        assert!(!auth.verify("secret2"));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("ab"), "***");
        assert_eq!(mask_token("abcdef"), "abc***");
    }
}

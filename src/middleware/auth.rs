// SPDX-License-Identifier: MIT

//! JWT session authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (user email)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Avatar URL
    pub picture: String,
    /// Admin flag, computed server-side against the allow-list at issuance
    pub admin: bool,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from a verified session JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub name: String,
    pub picture: String,
    pub is_admin: bool,
}

impl AuthUser {
    /// Gate an operation on admin privilege.
    ///
    /// Runs after `require_auth` has verified the session, never instead
    /// of it.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// Middleware that requires a valid session JWT.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get("vs_token") {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
            _ => return Err(StatusCode::UNAUTHORIZED),
        }
    };

    let key = DecodingKey::from_secret(&state.config.jwt_signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<SessionClaims>(&token, &key, &validation)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let claims = token_data.claims;
    let auth_user = AuthUser {
        email: claims.sub,
        name: claims.name,
        picture: claims.picture,
        is_admin: claims.admin,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Create a session JWT for a verified identity.
pub fn create_session_jwt(
    email: &str,
    name: &str,
    picture: &str,
    is_admin: bool,
    ttl_secs: u64,
    signing_key: &[u8],
) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = SessionClaims {
        sub: email.to_string(),
        name: name.to_string(),
        picture: picture.to_string(),
        admin: is_admin,
        iat: now,
        exp: now + ttl_secs as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

    #[test]
    fn test_session_jwt_roundtrip() {
        let token = create_session_jwt(
            "user@example.com",
            "Người Dùng",
            "https://i.pravatar.cc/150?u=user",
            false,
            3600,
            TEST_KEY,
        )
        .unwrap();

        let key = DecodingKey::from_secret(TEST_KEY);
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<SessionClaims>(&token, &key, &validation).unwrap();

        assert_eq!(data.claims.sub, "user@example.com");
        assert_eq!(data.claims.name, "Người Dùng");
        assert!(!data.claims.admin);
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn test_expired_session_is_rejected() {
        use jsonwebtoken::{encode, EncodingKey, Header};
        use std::time::{SystemTime, UNIX_EPOCH};

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;

        // Expired well past the default leeway, signature still valid.
        let claims = SessionClaims {
            sub: "user@example.com".to_string(),
            name: "User".to_string(),
            picture: String::new(),
            admin: false,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_KEY),
        )
        .unwrap();

        let key = DecodingKey::from_secret(TEST_KEY);
        let validation = Validation::new(Algorithm::HS256);
        assert!(decode::<SessionClaims>(&token, &key, &validation).is_err());
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let token =
            create_session_jwt("user@example.com", "User", "", false, 3600, TEST_KEY).unwrap();

        let key = DecodingKey::from_secret(b"a_completely_different_key_here!");
        let validation = Validation::new(Algorithm::HS256);
        assert!(decode::<SessionClaims>(&token, &key, &validation).is_err());
    }

    #[test]
    fn test_require_admin() {
        let admin = AuthUser {
            email: "admin@aivoice.studio".to_string(),
            name: "Admin".to_string(),
            picture: String::new(),
            is_admin: true,
        };
        let user = AuthUser {
            email: "user@example.com".to_string(),
            name: "User".to_string(),
            picture: String::new(),
            is_admin: false,
        };

        assert!(admin.require_admin().is_ok());
        assert!(matches!(user.require_admin(), Err(AppError::Forbidden)));
    }
}

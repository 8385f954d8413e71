//! Bearer-credential verification.
//!
//! The server never stores credentials. An [`IdentityVerifier`] turns an
//! opaque bearer token into a stable user id; everything else about the
//! identity provider stays behind this trait.

pub mod jwt;
pub mod static_token;

use async_trait::async_trait;
use thiserror::Error;

pub use jwt::JwtVerifier;
pub use static_token::StaticTokenVerifier;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("unknown token")]
    UnknownToken,

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Converts a bearer token into the caller's user id.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    async fn verify(&self, token: &str) -> Result<String, AuthError>;
}

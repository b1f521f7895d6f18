//! Dashboard authorization.

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;

/// Reasons a mutation request is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No usable `Authorization: Bearer` header.
    #[error("Authorization required")]
    Missing,

    /// A token was presented but not accepted.
    #[error("Invalid or expired token")]
    Invalid,
}

/// Decides whether a request may change the rate table.
pub trait Authenticator: Send + Sync {
    /// Check the raw `Authorization` header value, if any.
    fn authorize(&self, authorization: Option<&str>) -> Result<(), AuthError>;
}

/// Accepts exactly one configured bearer token.
///
/// Only the SHA-256 digest of the token is kept in memory.
pub struct StaticTokenAuthenticator {
    digest: [u8; 32],
}

impl StaticTokenAuthenticator {
    /// Create an authenticator for `token`.
    pub fn new(token: &str) -> Self {
        Self {
            digest: sha256(token.as_bytes()),
        }
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authorize(&self, authorization: Option<&str>) -> Result<(), AuthError> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(AuthError::Missing)?;

        let presented = sha256(token.as_bytes());
        let diff = presented
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));

        if diff != 0 {
            warn!("Rejected dashboard token");
            return Err(AuthError::Invalid);
        }

        Ok(())
    }
}

/// Extract the token from `Bearer <token>`.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;

    if !scheme.eq_ignore_ascii_case("bearer") || parts.next().is_some() {
        return None;
    }

    Some(token)
}

fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

//! Session token generation and hashing.
//!
//! Token format: `sos_st_<32 random bytes base64url>`.
//!
//! Tokens are bearer credentials: the raw value goes to the client (cookie or
//! Authorization header) and only its SHA-256 hash is stored.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Session token prefix.
pub const SESSION_TOKEN_PREFIX: &str = "sos_st_";

/// Session lifetime.
pub const SESSION_LIFETIME_DAYS: i64 = 7;

/// Token bytes (32 bytes = 256 bits of entropy).
const TOKEN_BYTES: usize = 32;

/// Generate a new session token.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    let encoded = URL_SAFE_NO_PAD.encode(bytes);
    format!("{}{}", SESSION_TOKEN_PREFIX, encoded)
}

/// Hash a token for storage using SHA-256.
/// The hash is returned as a hex string.
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{:x}", digest)
}

/// Expiry timestamp for a session issued now.
pub fn session_expires_at() -> DateTime<Utc> {
    Utc::now() + Duration::days(SESSION_LIFETIME_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_carry_prefix_and_entropy() {
        let token = generate_session_token();
        assert!(token.starts_with(SESSION_TOKEN_PREFIX));
        // 32 bytes base64url without padding is 43 characters.
        assert_eq!(token.len(), SESSION_TOKEN_PREFIX.len() + 43);
        assert_ne!(token, generate_session_token());
    }

    #[test]
    fn hash_is_deterministic_and_not_the_token() {
        let token = generate_session_token();
        let hash = hash_token(&token);
        assert_eq!(hash, hash_token(&token));
        assert_ne!(hash, token);
        assert_eq!(hash.len(), 64);
    }
}

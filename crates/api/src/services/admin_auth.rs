//! Admin authentication: password hashing and bearer tokens.
//!
//! Tokens are HMAC-SHA256 signed claims, shaped as
//! `base64url(claims_json) + "." + base64url(mac)`. They are bearer
//! credentials for the admin panel only and expire after 24 hours.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use soundbeatx_core::{AdminId, AdminRole};

use crate::models::CurrentAdmin;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime in seconds (24 hours).
const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Minimum accepted admin password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from the admin auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but is deactivated.
    #[error("account is deactivated")]
    AccountDisabled,

    /// No bearer token on the request.
    #[error("no token provided")]
    TokenMissing,

    /// Token failed to parse or verify.
    #[error("invalid token")]
    TokenInvalid,

    /// Token verified but is past its expiry.
    #[error("token expired")]
    TokenExpired,

    /// Registration collided with an existing account.
    #[error("admin already exists")]
    AlreadyExists,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Signed claims embedded in a token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: AdminRole,
    exp: i64,
}

/// Signs and verifies admin bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: SecretString,
}

impl TokenSigner {
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Issue a token for an admin, valid for 24 hours from `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Hash` if claim serialization fails, which does
    /// not happen for well-formed claims.
    pub fn sign(
        &self,
        admin_id: &AdminId,
        email: &str,
        role: AdminRole,
        now: i64,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: admin_id.as_str().to_string(),
            email: email.to_string(),
            role,
            exp: now + TOKEN_TTL_SECS,
        };
        let payload = serde_json::to_vec(&claims).map_err(|e| AuthError::Hash(e.to_string()))?;
        let encoded = URL_SAFE_NO_PAD.encode(&payload);

        let mac = self.mac_for(encoded.as_bytes())?;
        Ok(format!("{encoded}.{}", URL_SAFE_NO_PAD.encode(mac)))
    }

    /// Verify a token and return the admin it identifies.
    ///
    /// # Errors
    ///
    /// Returns `TokenInvalid` for malformed or tampered tokens and
    /// `TokenExpired` for tokens past their expiry.
    pub fn verify(&self, token: &str, now: i64) -> Result<CurrentAdmin, AuthError> {
        let (payload_b64, sig_b64) = token.split_once('.').ok_or(AuthError::TokenInvalid)?;

        let signature = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| AuthError::TokenInvalid)?;
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| AuthError::TokenInvalid)?;
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::TokenInvalid)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::TokenInvalid)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::TokenInvalid)?;

        if claims.exp <= now {
            return Err(AuthError::TokenExpired);
        }

        let id = claims
            .sub
            .parse::<AdminId>()
            .map_err(|_| AuthError::TokenInvalid)?;
        Ok(CurrentAdmin {
            id,
            email: claims.email,
            role: claims.role,
        })
    }

    fn mac_for(&self, payload: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match
/// or the stored hash is unparseable.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Validate a new password meets requirements.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(SecretString::from(
            "kX9mP2vQ7wR4tY8uZ1aB5cD6eF3gH0jL".to_string(),
        ))
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let signer = signer();
        let id = AdminId::generate();
        let now = 1_700_000_000;

        let token = signer
            .sign(&id, "admin@soundbeatx.in", AdminRole::Admin, now)
            .unwrap();
        let current = signer.verify(&token, now + 60).unwrap();

        assert_eq!(current.id, id);
        assert_eq!(current.email, "admin@soundbeatx.in");
        assert_eq!(current.role, AdminRole::Admin);
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = signer();
        let id = AdminId::generate();
        let now = 1_700_000_000;

        let token = signer
            .sign(&id, "admin@soundbeatx.in", AdminRole::Admin, now)
            .unwrap();
        let result = signer.verify(&token, now + TOKEN_TTL_SECS + 1);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let signer = signer();
        let id = AdminId::generate();
        let now = 1_700_000_000;

        let token = signer
            .sign(&id, "admin@soundbeatx.in", AdminRole::Admin, now)
            .unwrap();

        // Flip a character in the claims segment
        let mut chars: Vec<char> = token.chars().collect();
        chars[5] = if chars[5] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        assert!(matches!(
            signer.verify(&tampered, now),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = signer();
        let other = TokenSigner::new(SecretString::from(
            "zW3nM8bV2cX6kJ1hG5fD9sA4qP7rT0yU".to_string(),
        ));
        let id = AdminId::generate();
        let now = 1_700_000_000;

        let token = signer
            .sign(&id, "admin@soundbeatx.in", AdminRole::Admin, now)
            .unwrap();
        assert!(matches!(
            other.verify(&token, now),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_garbage_tokens_rejected() {
        let signer = signer();
        assert!(signer.verify("", 0).is_err());
        assert!(signer.verify("no-dot-here", 0).is_err());
        assert!(signer.verify("a.b.c", 0).is_err());
        assert!(signer.verify("!!!.###", 0).is_err());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }

    #[test]
    fn test_password_length_requirement() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough password").is_ok());
    }
}

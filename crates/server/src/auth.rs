//! Caller identity.
//!
//! Requests carry an `Authorization: Bearer <token>` header. Checking the token
//! is delegated to an [`IdentityVerifier`], which yields the caller's user id
//! (the token subject). The server never interprets the token itself.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No authorization token was found")]
    MissingCredentials,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Token has no subject")]
    MissingSubject,
    #[error("Invalid verification key: {0}")]
    InvalidKey(String),
}

/// Verifies a bearer credential and returns the verified subject.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// The verified user id of the current request, attached by the auth
/// middleware.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller(pub String);

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
}

/// JWT access-token verifier.
///
/// Checks the signature, `exp`, the audience and, when configured, the issuer.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Verifier for tokens signed with a shared HS256 secret.
    pub fn hs256(secret: &[u8], audience: &str, issuer: Option<&str>) -> Self {
        Self::new(
            DecodingKey::from_secret(secret),
            Algorithm::HS256,
            audience,
            issuer,
        )
    }

    /// Verifier for tokens signed by an RS256 key, given its PEM public key.
    pub fn rs256_pem(pem: &[u8], audience: &str, issuer: Option<&str>) -> Result<Self, AuthError> {
        let key =
            DecodingKey::from_rsa_pem(pem).map_err(|err| AuthError::InvalidKey(err.to_string()))?;
        Ok(Self::new(key, Algorithm::RS256, audience, issuer))
    }

    fn new(key: DecodingKey, algorithm: Algorithm, audience: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[audience]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Self { key, validation }
    }
}

impl IdentityVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))?;

        data.claims
            .sub
            .filter(|sub| !sub.trim().is_empty())
            .ok_or(AuthError::MissingSubject)
    }
}

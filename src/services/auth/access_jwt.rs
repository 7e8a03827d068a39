use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;
use std::{error::Error as StdError, fmt};

// Errors returned by access-token verification.
#[derive(Debug)]
pub enum AccessJwtError {
    Jwt(jsonwebtoken::errors::Error),
    NotAnObject,
}

impl fmt::Display for AccessJwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::NotAnObject => write!(f, "jwt payload is not a JSON object"),
        }
    }
}

impl StdError for AccessJwtError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AccessJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// EdDSA (Ed25519) access-token verifier.
///
/// Produces the claims payload as-is; reading individual claims is left to
/// `JwtRequestExt` on the request side.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        access_public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, AccessJwtError> {
        let decoding_key = DecodingKey::from_ed_pem(access_public_key_pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify signature + `exp` / `iss` / `aud` and return the raw claims.
    pub fn verify(&self, token: &str) -> Result<Value, AccessJwtError> {
        let data = jsonwebtoken::decode::<Value>(token, &self.decoding_key, &self.validation)?;

        if !data.claims.is_object() {
            return Err(AccessJwtError::NotAnObject);
        }

        Ok(data.claims)
    }
}

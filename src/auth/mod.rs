use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::StreamClaims;

/// Issues the signed credential the hosted video service accepts.
///
/// Stateless: every call mints a fresh token from (user id, secret, clock).
/// Identity verification happens upstream at the identity provider; the
/// issuer trusts its caller.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Option<SigningKeys>,
    ttl_seconds: u64,
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        let keys = config.stream_secret.as_ref().map(|secret| SigningKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        Self {
            keys,
            ttl_seconds: config.token_ttl_seconds,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Mint a credential for `user_id`: `user_id` claim, issued-at now,
    /// expiry one TTL later, HS256 signature.
    pub fn issue(&self, user_id: &str) -> Result<String> {
        let keys = self.signing_keys()?;

        let now = Utc::now().timestamp();
        let claims = StreamClaims {
            user_id: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_seconds as i64,
        };

        let token = encode(&Header::default(), &claims, &keys.encoding)?;
        Ok(token)
    }

    /// Validate a credential and return the claims.
    pub fn verify(&self, token: &str) -> Result<StreamClaims> {
        let keys = self.signing_keys()?;

        let validation = Validation::default();
        let token_data = decode::<StreamClaims>(token, &keys.decoding, &validation)?;
        Ok(token_data.claims)
    }

    fn signing_keys(&self) -> Result<&SigningKeys> {
        self.keys
            .as_ref()
            .ok_or_else(|| AppError::Config("signing secret is not configured".to_string()))
    }
}

/// Decode a token's claim set without checking the signature. Display and
/// debugging only, never an authorization check.
pub fn decode_unverified(token: &str) -> Result<StreamClaims> {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AppError::Internal("malformed token".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AppError::Internal(format!("malformed token payload: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Internal(format!("malformed token claims: {e}")))
}

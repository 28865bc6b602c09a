//! JWT token generation and validation
//! Tokens carry a single access class ("auth") and an explicit expiry

use crate::{config::AppConfig, error::AppError, models::user::ACCESS_AUTH};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for auth tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Access class ("auth" is the only class)
    pub access: String,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// Token signing/verification service
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    auth_token_exp_secs: u64,
}

impl TokenService {
    /// Create token service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        Ok(Self {
            encoding_key,
            decoding_key,
            auth_token_exp_secs: config.security.auth_token_exp_secs,
        })
    }

    /// Sign a token bound to a user id under the "auth" access class
    pub fn sign(&self, user_id: &Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::seconds(self.auth_token_exp_secs as i64);

        let claims = Claims {
            sub: user_id.to_string(),
            access: ACCESS_AUTH.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode auth token: {:?}", e);
            AppError::Internal(format!("Failed to encode auth token: {}", e))
        })
    }

    /// Validate and decode a token.
    /// Signature, structure and expiry are checked here, before any store
    /// lookup happens.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                AppError::InvalidToken
            })?
            .claims;

        if claims.access != ACCESS_AUTH {
            tracing::debug!("Access class mismatch: expected 'auth', got '{}'", claims.access);
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }
}

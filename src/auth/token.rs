use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::db::models::TokenPair;
use crate::db::repository::UserRepository;
use crate::error::{AppError, AuthError};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // User ID
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub kind: TokenKind,
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken.into())
    }
}

/// Signs and checks HS256 session tokens and records the current pair on the account.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    store: Arc<dyn UserRepository>,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig, store: Arc<dyn UserRepository>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::hours(config.access_token_ttl_hours),
            refresh_ttl: Duration::hours(config.refresh_token_ttl_hours),
            store,
        }
    }

    /// Issues an access token and a longer-lived refresh token for the same identity.
    pub fn issue(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        user_id: Uuid,
    ) -> Result<TokenPair> {
        let token = self.sign(email, first_name, last_name, user_id, TokenKind::Access)?;
        let refresh_token = self.sign(email, first_name, last_name, user_id, TokenKind::Refresh)?;
        Ok(TokenPair { token, refresh_token })
    }

    /// Stores a freshly issued pair on the account identified by `user_id`.
    pub async fn refresh(&self, token: &str, refresh_token: &str, user_id: Uuid) -> Result<()> {
        let applied = self
            .store
            .update_tokens(user_id, token, refresh_token, Utc::now())
            .await?;

        if !applied {
            warn!("Token update matched no account for user {}", user_id);
            return Err(AppError::InternalError(format!(
                "token update did not apply to user {}",
                user_id
            )));
        }

        debug!("Stored new token pair for user {}", user_id);
        Ok(())
    }

    /// Checks signature, expiry and kind without touching the store.
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )?;

        if data.claims.kind != expected {
            return Err(AuthError::InvalidToken.into());
        }
        Ok(data.claims)
    }

    fn sign(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        user_id: Uuid,
        kind: TokenKind,
    ) -> Result<String> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            kind,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("failed to sign token: {}", e)))
    }
}

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::password::{PasswordError, PasswordHasher};
use crate::auth::token::TokenIssuer;
use crate::config::AuthConfig;
use crate::db::models::{NewUser, TokenPair, User};
use crate::db::repository::UserRepository;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::validation::{normalize_email, validate_new_user};
use crate::Result;

const DUPLICATE_EMAIL: &str = "this email already exists";

/// Account registration and login.
pub struct AuthService {
    store: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    // Checked on logins for unknown addresses so they cost the same bcrypt work.
    dummy_hash: String,
}

/// A freshly registered account together with the session it was issued.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,
    pub tokens: TokenPair,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserRepository>, config: &AuthConfig) -> Self {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        Self {
            dummy_hash: hasher.hash(&Uuid::new_v4().to_string()),
            hasher,
            tokens: TokenIssuer::new(config, store.clone()),
            store,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Validates and stores a new account, returning it with its first token pair.
    ///
    /// The pre-insert email lookup gives a fast answer for the common case; the store's
    /// unique constraint decides when two signups race.
    pub async fn register(&self, candidate: NewUser) -> Result<Registration> {
        let candidate = validate_new_user(candidate)?;

        if self.store.email_exists(&candidate.email).await? {
            debug!("Signup rejected, email already registered");
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let password_hash = self.hash_password(candidate.password).await?;

        let now = Utc::now();
        let id = Uuid::new_v4();
        let tokens = self.tokens.issue(
            &candidate.email,
            &candidate.first_name,
            &candidate.last_name,
            id,
        )?;

        let user = User {
            id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            date_of_birth: candidate.date_of_birth,
            email: candidate.email,
            password_hash,
            user_type: candidate.user_type,
            experience_level: candidate.experience_level,
            college: candidate.college,
            current_company: candidate.current_company,
            resume_urls: candidate.resume_urls,
            token: Some(tokens.token.clone()),
            refresh_token: Some(tokens.refresh_token.clone()),
            created_at: now,
            updated_at: now,
        };

        match self.store.insert_user(&user).await {
            Ok(()) => {}
            Err(AppError::DatabaseError(DatabaseError::Duplicate)) => {
                warn!("Concurrent signup lost the race for an email address");
                return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
            }
            Err(e) => return Err(e),
        }

        info!("Registered user {}", user.id);
        Ok(Registration { user, tokens })
    }

    /// Checks credentials and starts a new session.
    ///
    /// Unknown addresses and wrong passwords fail with the same `InvalidCredentials` error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<TokenPair> {
        let email = normalize_email(email);

        let user = match self.store.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                debug!("Login attempt for unknown account");
                let _ = self.verify_password(&self.dummy_hash, password).await?;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if let Err(reason) = self.verify_password(&user.password_hash, password).await? {
            debug!("Password check failed for user {}: {}", user.id, reason);
            return Err(AuthError::InvalidCredentials.into());
        }

        let tokens = self
            .tokens
            .issue(&user.email, &user.first_name, &user.last_name, user.id)?;
        self.tokens
            .refresh(&tokens.token, &tokens.refresh_token, user.id)
            .await?;

        info!("User {} logged in", user.id);
        Ok(tokens)
    }

    // bcrypt is deliberately slow; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                // A panicking hasher is fatal; don't turn it into an ordinary error.
                if e.is_panic() {
                    std::panic::resume_unwind(e.into_panic());
                }
                AppError::InternalError(format!("password hashing task failed: {}", e))
            })
    }

    async fn verify_password(
        &self,
        hash: &str,
        password: &str,
    ) -> Result<std::result::Result<(), PasswordError>> {
        let hasher = self.hasher;
        let hash = hash.to_string();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| AppError::InternalError(format!("password check task failed: {}", e)))
    }
}

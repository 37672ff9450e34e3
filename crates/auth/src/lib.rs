//! Authentication for the Airnest backend: password registration and
//! credential checks, OAuth sign-in, and stateless session tokens.

use airnest_config::AuthConfig;
use airnest_database::{CreateUserRequest, DatabaseError, User, UserRepository};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

pub mod oauth;
pub mod password;
pub mod session;

pub use oauth::{parse_redirect_uri, OAuthClient, OAuthProfile, OAuthProvider};
pub use session::{SessionClaims, SessionManager};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0} oauth is not configured")]
    ProviderDisabled(OAuthProvider),
    #[error("unknown oauth provider: {0}")]
    UnknownProvider(String),
    #[error("invalid redirect uri: {0}")]
    InvalidRedirectUri(String),
    #[error("oauth error: {0}")]
    OAuth(#[from] anyhow::Error),
    #[error("account is linked to a different sign-in method")]
    AccountNotLinked,
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error("session expired")]
    SessionExpired,
    #[error("invalid session token")]
    InvalidSession,
    #[error("failed to sign session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// A signed session handed back to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Authenticator {
    users: UserRepository,
    sessions: SessionManager,
    github: Option<OAuthClient>,
    google: Option<OAuthClient>,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: &AuthConfig) -> Result<Self, AuthError> {
        let github = OAuthClient::from_config(OAuthProvider::Github, &config.github)?;
        let google = OAuthClient::from_config(OAuthProvider::Google, &config.google)?;

        debug!(
            github = github.is_some(),
            google = google.is_some(),
            "configured oauth providers"
        );

        Ok(Self {
            users: UserRepository::new(pool),
            sessions: SessionManager::from_config(config),
            github,
            google,
        })
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn enabled_providers(&self) -> Vec<OAuthProvider> {
        OAuthProvider::ALL
            .into_iter()
            .filter(|provider| self.oauth_client(*provider).is_ok())
            .collect()
    }

    pub fn oauth_client(&self, provider: OAuthProvider) -> Result<&OAuthClient, AuthError> {
        let client = match provider {
            OAuthProvider::Github => self.github.as_ref(),
            OAuthProvider::Google => self.google.as_ref(),
        };
        client.ok_or(AuthError::ProviderDisabled(provider))
    }

    pub fn authorization_url(
        &self,
        provider: OAuthProvider,
        state: &str,
        redirect_uri: &str,
    ) -> Result<String, AuthError> {
        let client = self.oauth_client(provider)?;
        let redirect = oauth::parse_redirect_uri(redirect_uri)?;
        Ok(client.authorize_url(state, redirect))
    }

    /// Hash the password and insert the user. Uniqueness of the email is left
    /// to the database; a conflict becomes [`AuthError::UserExists`].
    pub async fn register_with_password(
        &self,
        email: &str,
        name: Option<&str>,
        password: &str,
    ) -> Result<User, AuthError> {
        let hashed_password = password::hash_password(password)?;

        let request = CreateUserRequest {
            email: Some(email.to_owned()),
            name: name.map(str::to_owned),
            hashed_password: Some(hashed_password),
            image: None,
        };

        let user = self.users.create(&request).await.map_err(|error| {
            if error.is_duplicate() {
                AuthError::UserExists
            } else {
                AuthError::Database(error)
            }
        })?;

        info!(user = %user.public_id, "registered user with password");
        Ok(user)
    }

    /// Resolve an email/password pair to a user. Every rejection is the same
    /// [`AuthError::InvalidCredentials`].
    pub async fn authorize_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        let Some(stored_hash) = user.hashed_password.as_deref() else {
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify_password(password, stored_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let user = self.authorize_credentials(email, password).await?;
        self.issue_session(user)
    }

    pub async fn login_with_oauth_code(
        &self,
        provider: OAuthProvider,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AuthSession, AuthError> {
        let client = self.oauth_client(provider)?;
        let redirect = oauth::parse_redirect_uri(redirect_uri)?;

        let profile = client
            .exchange_code(code, redirect)
            .await
            .map_err(AuthError::OAuth)?;

        self.login_with_oauth_profile(provider, profile).await
    }

    /// Sign in with a provider identity: reuse the linked user, refuse an
    /// unlinked user with the same email, otherwise create and link.
    pub async fn login_with_oauth_profile(
        &self,
        provider: OAuthProvider,
        profile: OAuthProfile,
    ) -> Result<AuthSession, AuthError> {
        if let Some(user) = self
            .users
            .find_by_account(provider.as_str(), &profile.provider_account_id)
            .await?
        {
            return self.issue_session(user);
        }

        if let Some(email) = profile.email.as_deref() {
            if self.users.find_by_email(email).await?.is_some() {
                return Err(AuthError::AccountNotLinked);
            }
        }

        let request = CreateUserRequest {
            email: profile.email.clone(),
            name: profile.name.clone(),
            hashed_password: None,
            image: profile.image.clone(),
        };

        let user = self
            .users
            .create_with_account(&request, provider.as_str(), &profile.provider_account_id)
            .await
            .map_err(|error| {
                if error.is_duplicate() {
                    AuthError::AccountNotLinked
                } else {
                    AuthError::Database(error)
                }
            })?;

        info!(user = %user.public_id, %provider, "linked oauth identity");
        self.issue_session(user)
    }

    /// Validate a bearer token and load the current state of its user.
    pub async fn authenticate_token(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.sessions.validate(token)?;

        self.users
            .find_by_public_id(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidSession)
    }

    pub fn issue_session(&self, user: User) -> Result<AuthSession, AuthError> {
        let (token, expires_at) = self.sessions.issue(&user)?;
        Ok(AuthSession {
            token,
            user,
            expires_at,
        })
    }
}

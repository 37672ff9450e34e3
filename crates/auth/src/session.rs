//! Stateless session tokens (JWT, HS256).

use airnest_config::AuthConfig;
use airnest_database::User;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::AuthError;

const SESSION_AUDIENCE: &str = "airnest-web";

/// Ten years; anything longer is clamped.
const MAX_SESSION_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionClaims {
    /// Public id of the user
    pub sub: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl_seconds: u64) -> Self {
        let ttl_seconds = ttl_seconds.min(MAX_SESSION_TTL_SECONDS) as i64;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Build from configuration. Without a configured secret a random one is
    /// generated, so tokens stop validating after a restart.
    pub fn from_config(config: &AuthConfig) -> Self {
        match config.secret.as_deref().filter(|secret| !secret.is_empty()) {
            Some(secret) => {
                Self::new(secret.as_bytes(), &config.issuer, config.session_ttl_seconds)
            }
            None => {
                warn!("no auth secret configured, generating an ephemeral session key");
                let secret = generate_secret();
                Self::new(secret.as_bytes(), &config.issuer, config.session_ttl_seconds)
            }
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `user`, returning it with its expiry.
    pub fn issue(&self, user: &User) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let claims = SessionClaims {
            sub: user.public_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            picture: user.image.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: SESSION_AUDIENCE.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, expires_at))
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[SESSION_AUDIENCE]);

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidSession,
            })
    }
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

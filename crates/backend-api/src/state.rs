use std::{collections::HashMap, sync::Arc, time::Duration as StdDuration, time::Instant};

use airnest_auth::{Authenticator, OAuthProvider};
use airnest_config::ListingsConfig;
use airnest_database::User;
use axum::http::HeaderMap;
use rand::{distributions::Alphanumeric, Rng};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::debug;

use crate::util::optional_bearer;
use crate::ApiError;

const DEFAULT_OAUTH_STATE_TTL: StdDuration = StdDuration::from_secs(600);

#[derive(Clone)]
pub struct AppState {
    db_pool: SqlitePool,
    authenticator: Authenticator,
    oauth_state: OAuthStateStore,
    listings: ListingsConfig,
}

impl AppState {
    pub fn new(
        db_pool: SqlitePool,
        authenticator: Authenticator,
        listings: ListingsConfig,
    ) -> Self {
        Self {
            db_pool,
            authenticator,
            oauth_state: OAuthStateStore::default(),
            listings,
        }
    }

    pub fn db_pool(&self) -> &SqlitePool {
        &self.db_pool
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn oauth_state(&self) -> &OAuthStateStore {
        &self.oauth_state
    }

    pub fn listings_config(&self) -> &ListingsConfig {
        &self.listings
    }

    pub async fn authenticate(&self, token: &str) -> Result<User, ApiError> {
        self.authenticator
            .authenticate_token(token)
            .await
            .map_err(ApiError::from)
    }

    /// The caller's user when a valid session accompanies the request.
    /// Missing or rejected tokens yield `None`.
    pub async fn current_user(&self, headers: &HeaderMap) -> Option<User> {
        let token = optional_bearer(headers)?;
        match self.authenticator.authenticate_token(&token).await {
            Ok(user) => Some(user),
            Err(error) => {
                debug!(%error, "ignoring invalid session on public endpoint");
                None
            }
        }
    }
}

/// Single-use OAuth `state` values, each bound to the provider it was issued for.
#[derive(Clone)]
pub struct OAuthStateStore {
    inner: Arc<Mutex<HashMap<String, (OAuthProvider, Instant)>>>,
    ttl: StdDuration,
}

impl OAuthStateStore {
    pub fn new(ttl: StdDuration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn issue(&self, provider: OAuthProvider) -> String {
        let state = Self::random_state();
        self.store(state.clone(), provider).await;
        state
    }

    pub async fn store(&self, state: String, provider: OAuthProvider) {
        let mut guard = self.inner.lock().await;
        Self::prune(&mut guard, self.ttl);
        guard.insert(state, (provider, Instant::now()));
    }

    /// Remove `state`; true only if it was live and issued for `provider`.
    pub async fn consume(&self, state: &str, provider: OAuthProvider) -> bool {
        let mut guard = self.inner.lock().await;
        Self::prune(&mut guard, self.ttl);
        matches!(guard.remove(state), Some((issued_for, _)) if issued_for == provider)
    }

    fn random_state() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect()
    }

    fn prune(map: &mut HashMap<String, (OAuthProvider, Instant)>, ttl: StdDuration) {
        let now = Instant::now();
        map.retain(|_, (_, created)| now.duration_since(*created) <= ttl);
    }
}

impl Default for OAuthStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_OAUTH_STATE_TTL)
    }
}

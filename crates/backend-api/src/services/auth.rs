use airnest_auth::{parse_redirect_uri, AuthSession, Authenticator, OAuthProvider};
use airnest_database::User;
use tracing::warn;

use super::error::ServiceError;
use crate::routes::models::{
    CredentialsRequest, OAuthCallbackRequest, ProviderInfo, RegisterRequest,
};
use crate::state::OAuthStateStore;

/// Credentials first, then every OAuth provider with a configured client.
pub fn providers(authenticator: &Authenticator) -> Vec<ProviderInfo> {
    let credentials = ProviderInfo {
        id: "credentials".to_string(),
        name: "Credentials".to_string(),
        kind: "credentials".to_string(),
    };

    std::iter::once(credentials)
        .chain(
            authenticator
                .enabled_providers()
                .into_iter()
                .map(|provider| ProviderInfo {
                    id: provider.as_str().to_string(),
                    name: provider.display_name().to_string(),
                    kind: "oauth".to_string(),
                }),
        )
        .collect()
}

pub async fn signin_url(
    authenticator: &Authenticator,
    oauth_state: &OAuthStateStore,
    provider: &str,
    redirect_uri: &str,
) -> Result<String, ServiceError> {
    let provider: OAuthProvider = provider.parse()?;
    // Fail before issuing state for a request we cannot serve.
    authenticator.oauth_client(provider)?;
    parse_redirect_uri(redirect_uri)?;

    let state = oauth_state.issue(provider).await;
    Ok(authenticator.authorization_url(provider, &state, redirect_uri)?)
}

pub async fn oauth_callback(
    authenticator: &Authenticator,
    oauth_state: &OAuthStateStore,
    provider: &str,
    payload: OAuthCallbackRequest,
) -> Result<AuthSession, ServiceError> {
    let provider: OAuthProvider = provider.parse()?;
    authenticator.oauth_client(provider)?;
    // The state is single-use, so input errors are reported before it is spent.
    parse_redirect_uri(&payload.redirect_uri)?;

    if !oauth_state.consume(&payload.state, provider).await {
        warn!(%provider, "rejected oauth callback with unknown state");
        return Err(ServiceError::bad_request("invalid or expired OAuth state"));
    }

    Ok(authenticator
        .login_with_oauth_code(provider, &payload.code, &payload.redirect_uri)
        .await?)
}

pub async fn credentials_callback(
    authenticator: &Authenticator,
    payload: CredentialsRequest,
) -> Result<AuthSession, ServiceError> {
    Ok(authenticator
        .login_with_password(&payload.email, &payload.password)
        .await?)
}

pub async fn register(
    authenticator: &Authenticator,
    payload: RegisterRequest,
) -> Result<User, ServiceError> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ServiceError::bad_request("Missing fields"));
    };
    if email.is_empty() || password.is_empty() {
        return Err(ServiceError::bad_request("Missing fields"));
    }

    Ok(authenticator
        .register_with_password(&email, payload.name.as_deref(), &password)
        .await?)
}

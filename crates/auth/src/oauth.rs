//! OAuth authorization-code flow for the supported identity providers.

use std::fmt;
use std::str::FromStr;

use airnest_config::OAuthClientConfig;
use anyhow::Context;
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
    TokenResponse, TokenUrl,
};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AuthError;

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_API: &str = "https://api.github.com/user";
const GITHUB_EMAILS_API: &str = "https://api.github.com/user/emails";

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_API: &str = "https://openidconnect.googleapis.com/v1/userinfo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Github,
    Google,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 2] = [OAuthProvider::Github, OAuthProvider::Google];

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Github => "github",
            OAuthProvider::Google => "google",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OAuthProvider::Github => "GitHub",
            OAuthProvider::Google => "Google",
        }
    }

    fn scopes(&self) -> &'static [&'static str] {
        match self {
            OAuthProvider::Github => &["read:user", "user:email"],
            OAuthProvider::Google => &["openid", "email", "profile"],
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = AuthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "github" => Ok(OAuthProvider::Github),
            "google" => Ok(OAuthProvider::Google),
            _ => Err(AuthError::UnknownProvider(value.to_string())),
        }
    }
}

/// Parse a client-supplied redirect target. Only absolute URLs are accepted.
pub fn parse_redirect_uri(redirect_uri: &str) -> Result<RedirectUrl, AuthError> {
    RedirectUrl::new(redirect_uri.to_owned())
        .map_err(|_| AuthError::InvalidRedirectUri(redirect_uri.to_owned()))
}

/// Identity returned by a provider after a successful code exchange
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthProfile {
    pub provider_account_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct OAuthClient {
    provider: OAuthProvider,
    client: BasicClient,
    http: reqwest::Client,
}

impl OAuthClient {
    /// `None` when the provider's credentials are not both configured.
    pub fn from_config(
        provider: OAuthProvider,
        config: &OAuthClientConfig,
    ) -> anyhow::Result<Option<Self>> {
        let (Some(client_id), Some(client_secret)) =
            (config.client_id.clone(), config.client_secret.clone())
        else {
            return Ok(None);
        };

        Self::new(provider, client_id, client_secret).map(Some)
    }

    pub fn new(
        provider: OAuthProvider,
        client_id: String,
        client_secret: String,
    ) -> anyhow::Result<Self> {
        let (authorize_url, token_url) = match provider {
            OAuthProvider::Github => (GITHUB_AUTHORIZE_URL, GITHUB_TOKEN_URL),
            OAuthProvider::Google => (GOOGLE_AUTHORIZE_URL, GOOGLE_TOKEN_URL),
        };

        let mut client = BasicClient::new(
            ClientId::new(client_id),
            Some(ClientSecret::new(client_secret)),
            AuthUrl::new(authorize_url.to_string())
                .with_context(|| format!("invalid {provider} authorize url"))?,
            Some(
                TokenUrl::new(token_url.to_string())
                    .with_context(|| format!("invalid {provider} token url"))?,
            ),
        );
        if provider == OAuthProvider::Github {
            client = client.set_auth_type(AuthType::RequestBody);
        }

        let http = reqwest::Client::builder()
            .user_agent("airnest-backend")
            .build()
            .context("failed to build oauth http client")?;

        Ok(Self {
            provider,
            client,
            http,
        })
    }

    pub fn authorize_url(&self, state: &str, redirect: RedirectUrl) -> String {
        let client = self.client.clone().set_redirect_uri(redirect);
        let mut request = client.authorize_url(|| CsrfToken::new(state.to_owned()));
        for scope in self.provider.scopes() {
            request = request.add_scope(Scope::new(scope.to_string()));
        }

        let (url, _) = request.url();
        url.to_string()
    }

    pub async fn exchange_code(
        &self,
        code: &str,
        redirect: RedirectUrl,
    ) -> anyhow::Result<OAuthProfile> {
        let client = self.client.clone().set_redirect_uri(redirect);
        let token_response = client
            .exchange_code(AuthorizationCode::new(code.to_owned()))
            .request_async(async_http_client)
            .await
            .with_context(|| format!("failed to exchange {} oauth code", self.provider))?;

        let access_token = token_response.access_token().secret();

        match self.provider {
            OAuthProvider::Github => self.github_profile(access_token).await,
            OAuthProvider::Google => self.google_profile(access_token).await,
        }
    }

    async fn github_profile(&self, access_token: &str) -> anyhow::Result<OAuthProfile> {
        let user: GithubUserResponse = self
            .http
            .get(GITHUB_USER_API)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .context("failed to call github user api")?
            .error_for_status()
            .context("github user api returned error")?
            .json()
            .await
            .context("failed to decode github user response")?;

        debug!(login = %user.login, id = user.id, "fetched github user profile");

        let email = match user.email {
            Some(email) => Some(email),
            None => self.github_primary_email(access_token).await?,
        };

        Ok(OAuthProfile {
            provider_account_id: user.id.to_string(),
            email,
            name: user.name.or(Some(user.login)),
            image: user.avatar_url,
        })
    }

    /// Private addresses are only visible through the emails endpoint.
    async fn github_primary_email(&self, access_token: &str) -> anyhow::Result<Option<String>> {
        let emails: Vec<GithubEmail> = self
            .http
            .get(GITHUB_EMAILS_API)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .context("failed to call github emails api")?
            .error_for_status()
            .context("github emails api returned error")?
            .json()
            .await
            .context("failed to decode github emails response")?;

        Ok(primary_verified_email(emails))
    }

    async fn google_profile(&self, access_token: &str) -> anyhow::Result<OAuthProfile> {
        let user: GoogleUserInfo = self
            .http
            .get(GOOGLE_USERINFO_API)
            .bearer_auth(access_token)
            .send()
            .await
            .context("failed to call google userinfo api")?
            .error_for_status()
            .context("google userinfo api returned error")?
            .json()
            .await
            .context("failed to decode google userinfo response")?;

        debug!(sub = %user.sub, "fetched google user profile");

        Ok(OAuthProfile {
            provider_account_id: user.sub,
            email: user.email,
            name: user.name,
            image: user.picture,
        })
    }
}

fn primary_verified_email(emails: Vec<GithubEmail>) -> Option<String> {
    emails
        .into_iter()
        .find(|entry| entry.primary && entry.verified)
        .map(|entry| entry.email)
}

#[derive(Deserialize)]
struct GithubUserResponse {
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Deserialize)]
struct GithubEmail {
    email: String,
    #[serde(default)]
    primary: bool,
    #[serde(default)]
    verified: bool,
}

#[derive(Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_round_trip() {
        for provider in OAuthProvider::ALL {
            assert_eq!(provider.as_str().parse::<OAuthProvider>().unwrap(), provider);
        }
        assert_eq!("GitHub".parse::<OAuthProvider>().unwrap(), OAuthProvider::Github);
        assert!(matches!(
            "facebook".parse::<OAuthProvider>(),
            Err(AuthError::UnknownProvider(name)) if name == "facebook"
        ));
    }

    #[test]
    fn unconfigured_provider_yields_none() {
        let config = OAuthClientConfig {
            client_id: Some("id".into()),
            client_secret: None,
        };
        assert!(OAuthClient::from_config(OAuthProvider::Google, &config)
            .unwrap()
            .is_none());
    }

    #[test]
    fn github_authorize_url_carries_state_and_scopes() {
        let client =
            OAuthClient::new(OAuthProvider::Github, "client".into(), "secret".into()).unwrap();
        let redirect =
            parse_redirect_uri("http://localhost:3000/api/auth/callback/github").unwrap();
        let url = client.authorize_url("state123", redirect);

        assert!(url.starts_with(GITHUB_AUTHORIZE_URL));
        assert!(url.contains("state=state123"));
        assert!(url.contains("client_id=client"));
        assert!(url.contains("user%3Aemail"));
    }

    #[test]
    fn google_authorize_url_requests_openid_scopes() {
        let client =
            OAuthClient::new(OAuthProvider::Google, "client".into(), "secret".into()).unwrap();
        let redirect =
            parse_redirect_uri("http://localhost:3000/api/auth/callback/google").unwrap();
        let url = client.authorize_url("abc", redirect);

        assert!(url.starts_with(GOOGLE_AUTHORIZE_URL));
        assert!(url.contains("openid"));
        assert!(url.contains("profile"));
    }

    #[test]
    fn malformed_redirect_is_a_client_error() {
        for value in ["not a url", "not-a-url", ""] {
            assert!(matches!(
                parse_redirect_uri(value),
                Err(AuthError::InvalidRedirectUri(uri)) if uri == value
            ));
        }
        assert!(parse_redirect_uri("http://localhost:3000/cb").is_ok());
    }

    #[test]
    fn picks_primary_verified_github_email() {
        let emails: Vec<GithubEmail> = serde_json::from_str(
            r#"[
                {"email": "old@example.com", "primary": false, "verified": true},
                {"email": "unverified@example.com", "primary": true, "verified": false},
                {"email": "main@example.com", "primary": true, "verified": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(primary_verified_email(emails).as_deref(), Some("main@example.com"));
        assert_eq!(primary_verified_email(Vec::new()), None);
    }
}

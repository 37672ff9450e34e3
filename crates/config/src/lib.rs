use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "airnest.toml",
    "config/airnest.toml",
    "crates/config/airnest.toml",
    "../airnest.toml",
    "../config/airnest.toml",
    "../../airnest.toml",
];

/// Environment variable names that predate the `AIRNEST__` prefix and are
/// still honoured, paired with the prefixed variable that takes precedence.
const WELL_KNOWN_ENV: &[(&str, &str)] = &[
    ("DATABASE_URL", "AIRNEST__DATABASE__URL"),
    ("NEXTAUTH_SECRET", "AIRNEST__AUTH__SECRET"),
    ("GITHUB_ID", "AIRNEST__AUTH__GITHUB__CLIENT_ID"),
    ("GITHUB_SECRET", "AIRNEST__AUTH__GITHUB__CLIENT_SECRET"),
    ("GOOGLE_CLIENT_ID", "AIRNEST__AUTH__GOOGLE__CLIENT_ID"),
    ("GOOGLE_CLIENT_SECRET", "AIRNEST__AUTH__GOOGLE__CLIENT_SECRET"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub listings: ListingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://airnest.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Session and identity provider settings.
///
/// ```
/// use airnest_config::AuthConfig;
///
/// let auth = AuthConfig::default();
/// assert_eq!(auth.session_ttl_seconds, 30 * 24 * 60 * 60);
/// assert!(auth.secret.is_none());
/// assert!(!auth.github.is_configured());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign session tokens.
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "AuthConfig::default_session_ttl")]
    pub session_ttl_seconds: u64,
    #[serde(default = "AuthConfig::default_issuer")]
    pub issuer: String,
    #[serde(default)]
    pub github: OAuthClientConfig,
    #[serde(default)]
    pub google: OAuthClientConfig,
}

impl AuthConfig {
    const fn default_session_ttl() -> u64 {
        30 * 24 * 60 * 60
    }

    fn default_issuer() -> String {
        "airnest".to_string()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            session_ttl_seconds: Self::default_session_ttl(),
            issuer: Self::default_issuer(),
            github: OAuthClientConfig::default(),
            google: OAuthClientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OAuthClientConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl OAuthClientConfig {
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListingsConfig {
    /// Reject listing payloads with empty fields instead of only logging them.
    #[serde(default)]
    pub strict_validation: bool,
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use airnest_config::load;
///
/// std::env::remove_var("AIRNEST_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let session_ttl = i64::try_from(defaults.auth.session_ttl_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.session_ttl_seconds", session_ttl)?
        .set_default("auth.issuer", defaults.auth.issuer.clone())?
        .set_default("listings.strict_validation", false)?;

    let environment_overrides = config::Environment::with_prefix("AIRNEST").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("AIRNEST_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via AIRNEST_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    apply_well_known_env(&mut config);

    if config.auth.session_ttl_seconds > i64::MAX as u64 {
        config.auth.session_ttl_seconds = i64::MAX as u64;
    }

    debug!(
        http = ?config.http,
        database = %config.database.url,
        github = config.auth.github.is_configured(),
        google = config.auth.google.is_configured(),
        "loaded backend configuration"
    );
    Ok(config)
}

fn apply_well_known_env(config: &mut AppConfig) {
    for (name, prefixed) in WELL_KNOWN_ENV {
        if std::env::var_os(prefixed).is_some() {
            continue;
        }
        let Ok(value) = std::env::var(name) else {
            continue;
        };

        debug!(variable = name, "applying well-known environment variable");
        match *name {
            "DATABASE_URL" => config.database.url = value,
            "NEXTAUTH_SECRET" => config.auth.secret = Some(value),
            "GITHUB_ID" => config.auth.github.client_id = Some(value),
            "GITHUB_SECRET" => config.auth.github.client_secret = Some(value),
            "GOOGLE_CLIENT_ID" => config.auth.google.client_id = Some(value),
            "GOOGLE_CLIENT_SECRET" => config.auth.google.client_secret = Some(value),
            _ => {}
        }
    }
}

//! Test plan for the `airnest-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, environment overrides, and the well-known variable names.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use airnest_config::{load, AppConfig, AuthConfig, HttpConfig, ListingsConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "AIRNEST_CONFIG",
    "AIRNEST__AUTH__GITHUB__CLIENT_ID",
    "AIRNEST__AUTH__GITHUB__CLIENT_SECRET",
    "AIRNEST__AUTH__GOOGLE__CLIENT_ID",
    "AIRNEST__AUTH__GOOGLE__CLIENT_SECRET",
    "AIRNEST__AUTH__SECRET",
    "AIRNEST__AUTH__SESSION_TTL_SECONDS",
    "AIRNEST__DATABASE__MAX_CONNECTIONS",
    "AIRNEST__DATABASE__URL",
    "AIRNEST__HTTP__ADDRESS",
    "AIRNEST__HTTP__PORT",
    "AIRNEST__LISTINGS__STRICT_VALIDATION",
    "DATABASE_URL",
    "GITHUB_ID",
    "GITHUB_SECRET",
    "GOOGLE_CLIENT_ID",
    "GOOGLE_CLIENT_SECRET",
    "NEXTAUTH_SECRET",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

fn isolated() -> (TempDir, TestContext) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());
    (temp_dir, ctx)
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let (_temp_dir, _ctx) = isolated();

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(
        config.database.max_connections,
        defaults.database.max_connections
    );
    assert_eq!(config.auth.session_ttl_seconds, defaults.auth.session_ttl_seconds);
    assert_eq!(config.auth.issuer, "airnest");
    assert!(config.auth.secret.is_none());
    assert!(!config.auth.github.is_configured());
    assert!(!config.auth.google.is_configured());
    assert!(!config.listings.strict_validation);
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "airnest.toml",
        r#"
        [http]
        port = 4242
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/airnest.toml",
        r#"
        [http]
        port = 5151
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.http.port, 4242);
}

#[test]
#[serial]
fn load_reads_file_named_by_airnest_config() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "elsewhere/custom.toml",
        r#"
        [listings]
        strict_validation = true
        "#,
    );
    ctx.set_var(
        "AIRNEST_CONFIG",
        temp_dir.path().join("elsewhere/custom.toml").display().to_string(),
    );

    let config = load().expect("configuration load should use AIRNEST_CONFIG");
    assert!(config.listings.strict_validation);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "airnest.toml",
        r#"
        [http]
        port = 8181

        [database]
        max_connections = 50

        [auth.github]
        client_id = "gh-id"
        client_secret = "gh-secret"
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.http.port, 8181);
    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.database.max_connections, 50);
    assert_eq!(config.database.url, defaults.database.url);
    assert!(config.auth.github.is_configured());
    assert!(!config.auth.google.is_configured());
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "airnest.toml",
        r#"
        [http]
        port = 3030
        "#,
    );

    ctx.set_var("AIRNEST__HTTP__PORT", "8080");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.http.port, 8080);
}

#[test]
#[serial]
fn load_honours_well_known_provider_variables() {
    let (_temp_dir, mut ctx) = isolated();

    ctx.set_var("GITHUB_ID", "github-client");
    ctx.set_var("GITHUB_SECRET", "github-secret");
    ctx.set_var("GOOGLE_CLIENT_ID", "google-client");
    ctx.set_var("GOOGLE_CLIENT_SECRET", "google-secret");
    ctx.set_var("NEXTAUTH_SECRET", "signing-secret");

    let config = load().expect("configuration load should read provider variables");
    assert_eq!(config.auth.github.client_id.as_deref(), Some("github-client"));
    assert_eq!(
        config.auth.github.client_secret.as_deref(),
        Some("github-secret")
    );
    assert_eq!(config.auth.google.client_id.as_deref(), Some("google-client"));
    assert_eq!(
        config.auth.google.client_secret.as_deref(),
        Some("google-secret")
    );
    assert_eq!(config.auth.secret.as_deref(), Some("signing-secret"));
}

#[test]
#[serial]
fn prefixed_variables_win_over_well_known_names() {
    let (_temp_dir, mut ctx) = isolated();

    ctx.set_var("DATABASE_URL", "sqlite://from-well-known.db");
    ctx.set_var("AIRNEST__DATABASE__URL", "sqlite://from-prefixed.db");

    let config = load().expect("configuration load should succeed");
    assert_eq!(config.database.url, "sqlite://from-prefixed.db");
}

#[test]
#[serial]
fn load_supports_database_url_environment_variable() {
    let (_temp_dir, mut ctx) = isolated();

    let url = "sqlite:///var/lib/airnest/airnest.db";
    ctx.set_var("DATABASE_URL", url);

    let config = load().expect("configuration load should read DATABASE_URL");
    assert_eq!(config.database.url, url);
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "airnest.toml",
        r#"
        [http]
        port = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration")
            || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn oauth_configs_default_to_unconfigured() {
    let defaults = AuthConfig::default();
    assert!(defaults.github.client_id.is_none());
    assert!(defaults.github.client_secret.is_none());
    assert!(defaults.google.client_id.is_none());
    assert!(!defaults.google.is_configured());
}

#[test]
fn listings_config_is_lenient_by_default() {
    assert!(!ListingsConfig::default().strict_validation);
}

#[test]
fn http_config_defaults_match_expected_host_and_port() {
    let defaults = HttpConfig::default();
    assert_eq!(defaults.address, "127.0.0.1");
    assert_eq!(defaults.port, 3000);
}

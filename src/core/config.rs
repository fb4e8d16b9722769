//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.askbox/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::state::RacePolicy;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AskboxConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavigationConfig {
    pub race_policy: Option<RacePolicy>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/v1";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub race_policy: RacePolicy,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.askbox/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".askbox").join("config.toml"))
}

/// Load config from `~/.askbox/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AskboxConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AskboxConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AskboxConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<AskboxConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(AskboxConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AskboxConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // Not `{:?}` of the whole config: it may hold a password.
    debug!(
        "Config: base_url={:?}, email={:?}, race_policy={:?}",
        config.api.base_url, config.session.email, config.navigation.race_policy
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# askbox configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [api]
# base_url = "http://localhost:3000/api/v1"   # Or set ASKBOX_BASE_URL

# [session]
# email = "hano@codecore.com"                  # Or set ASKBOX_EMAIL
# password = "supersecret"                     # Or set ASKBOX_PASSWORD

# [navigation]
# race_policy = "last-navigation-wins"         # or "last-completion-wins"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AskboxConfig, cli_base_url: Option<&str>) -> ResolvedConfig {
    resolve_with(config, cli_base_url, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], with the environment lookup supplied by the caller.
pub fn resolve_with<F>(config: &AskboxConfig, cli_base_url: Option<&str>, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Base URL: CLI → env → config → default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| env("ASKBOX_BASE_URL"))
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let email = env("ASKBOX_EMAIL").or_else(|| config.session.email.clone());
    let password = env("ASKBOX_PASSWORD").or_else(|| config.session.password.clone());

    // Race policy: env → config → default. A bad env value is ignored.
    let race_policy = env("ASKBOX_RACE_POLICY")
        .and_then(|raw| match raw.parse() {
            Ok(policy) => Some(policy),
            Err(e) => {
                warn!("Ignoring ASKBOX_RACE_POLICY: {}", e);
                None
            }
        })
        .or(config.navigation.race_policy)
        .unwrap_or_default();

    ResolvedConfig {
        base_url,
        email,
        password,
        race_policy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = AskboxConfig::default();
        assert!(config.api.base_url.is_none());
        assert!(config.session.email.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with(&AskboxConfig::default(), None, no_env);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.race_policy, RacePolicy::LastNavigationWins);
        assert!(resolved.email.is_none());
        assert!(resolved.password.is_none());
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[api]
base_url = "http://qna.local/api/v1"

[session]
email = "hano@codecore.com"
password = "supersecret"

[navigation]
race_policy = "last-completion-wins"
"#;
        let config: AskboxConfig = toml::from_str(toml_str).unwrap();
        let resolved = resolve_with(&config, None, no_env);
        assert_eq!(resolved.base_url, "http://qna.local/api/v1");
        assert_eq!(resolved.email.as_deref(), Some("hano@codecore.com"));
        assert_eq!(resolved.password.as_deref(), Some("supersecret"));
        assert_eq!(resolved.race_policy, RacePolicy::LastCompletionWins);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config: AskboxConfig = toml::from_str("[session]\nemail = \"a@b.c\"\n").unwrap();
        assert_eq!(config.session.email.as_deref(), Some("a@b.c"));
        assert!(config.api.base_url.is_none());
        assert!(config.navigation.race_policy.is_none());
    }

    #[test]
    fn test_unknown_race_policy_is_a_parse_error() {
        let result: Result<AskboxConfig, _> =
            toml::from_str("[navigation]\nrace_policy = \"random\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides_config_and_cli_overrides_env() {
        let config: AskboxConfig =
            toml::from_str("[api]\nbase_url = \"http://from-file\"\n").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("ASKBOX_BASE_URL", "http://from-env"),
            ("ASKBOX_PASSWORD", "env-secret"),
            ("ASKBOX_RACE_POLICY", "last-completion-wins"),
        ]);
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let resolved = resolve_with(&config, None, lookup);
        assert_eq!(resolved.base_url, "http://from-env");
        assert_eq!(resolved.password.as_deref(), Some("env-secret"));
        assert_eq!(resolved.race_policy, RacePolicy::LastCompletionWins);

        let resolved = resolve_with(&config, Some("http://from-cli"), lookup);
        assert_eq!(resolved.base_url, "http://from-cli");
    }

    #[test]
    fn test_bad_env_race_policy_falls_back() {
        let resolved = resolve_with(&AskboxConfig::default(), None, |key| {
            (key == "ASKBOX_RACE_POLICY").then(|| "sometimes".to_string())
        });
        assert_eq!(resolved.race_policy, RacePolicy::LastNavigationWins);
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = std::env::temp_dir().join(format!("askbox-config-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_dir_all(&dir);

        let config = load_config_from(&path).unwrap();
        assert!(config.api.base_url.is_none());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("# [api]"));

        // The generated file is all comments, so it loads as defaults.
        let reloaded = load_config_from(&path).unwrap();
        assert!(reloaded.session.email.is_none());
        let _ = fs::remove_dir_all(&dir);
    }
}

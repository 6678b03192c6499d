//! # Configuration
//!
//! Settings are resolved in three layers, later layers winning:
//!
//! 1. Built-in defaults (a local Neo4j on `bolt://localhost:7687`)
//! 2. An optional TOML file (`--config <path>` or `WIKIGRAPH_CONFIG`)
//! 3. Environment variables
//!
//! ## Environment Variables
//!
//! - `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`, `NEO4J_DATABASE`
//! - `WIKIGRAPH_MAX_CONNECTIONS`: Bolt pool size
//! - `WIKIGRAPH_DEBUG`: include engine diagnostics in error bodies
//! - `WIKIGRAPH_CORS_ORIGINS`: comma-separated origins, or `*` for all
//! - `WIKIGRAPH_NATIVE_ALGORITHMS`: `false` skips the native algorithm engine
//! - `WIKIGRAPH_API_KEY`: if set, requires Bearer token authentication
//! - `WIKIGRAPH_RATE_LIMIT`: requests per second (0 to disable)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use wikigraph_core::WikiGraphError;

/// Environment variable naming the TOML settings file.
pub const CONFIG_ENV: &str = "WIKIGRAPH_CONFIG";

// =============================================================================
// SETTINGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub neo4j: Neo4jSettings,
    pub server: ServerSettings,
    pub algorithms: AlgorithmSettings,
}

/// Graph store connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Database name; the server default when unset.
    pub database: Option<String>,
    pub max_connections: usize,
    pub fetch_size: usize,
    /// Upper bound for a connectivity probe, in seconds.
    pub connectivity_timeout_secs: u64,
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            database: None,
            max_connections: 16,
            fetch_size: 256,
            connectivity_timeout_secs: 5,
        }
    }
}

impl Neo4jSettings {
    #[must_use]
    pub fn connectivity_timeout(&self) -> Duration {
        Duration::from_secs(self.connectivity_timeout_secs)
    }
}

/// HTTP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Expose engine diagnostics in error responses.
    pub debug: bool,
    /// Allowed CORS origins. `["*"]` allows all; empty means localhost only.
    pub cors_origins: Vec<String>,
    /// Bearer token required on every route but `/` and `/health`.
    pub api_key: Option<String>,
    /// Global requests per second; 0 disables limiting.
    pub rate_limit: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            debug: false,
            cors_origins: Vec::new(),
            api_key: None,
            rate_limit: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmSettings {
    /// Try the native algorithm engine before falling back.
    pub native_enabled: bool,
}

impl Default for AlgorithmSettings {
    fn default() -> Self {
        Self {
            native_enabled: true,
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

impl Settings {
    /// Resolve settings from an optional file plus the environment.
    ///
    /// An explicit `path` wins over `WIKIGRAPH_CONFIG`.
    pub fn load(path: Option<&Path>) -> Result<Self, WikiGraphError> {
        let from_env = std::env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty());
        let mut settings = match (path, from_env.as_deref()) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(env_path)) => Self::from_file(Path::new(env_path))?,
            (None, None) => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse a TOML settings file.
    pub fn from_file(path: &Path) -> Result<Self, WikiGraphError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| WikiGraphError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, WikiGraphError> {
        toml::from_str(raw).map_err(|e| WikiGraphError::Config(e.to_string()))
    }

    /// Overlay variables from `lookup` (the process environment in
    /// production). Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), WikiGraphError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(uri) = get("NEO4J_URI") {
            self.neo4j.uri = uri;
        }
        if let Some(user) = get("NEO4J_USER") {
            self.neo4j.user = user;
        }
        if let Some(password) = get("NEO4J_PASSWORD") {
            self.neo4j.password = password;
        }
        if let Some(database) = get("NEO4J_DATABASE") {
            self.neo4j.database = Some(database);
        }
        if let Some(raw) = get("WIKIGRAPH_MAX_CONNECTIONS") {
            self.neo4j.max_connections = parse_var("WIKIGRAPH_MAX_CONNECTIONS", &raw)?;
        }
        if let Some(raw) = get("WIKIGRAPH_DEBUG") {
            self.server.debug = parse_flag("WIKIGRAPH_DEBUG", &raw)?;
        }
        if let Some(raw) = get("WIKIGRAPH_CORS_ORIGINS") {
            self.server.cors_origins = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(raw) = get("WIKIGRAPH_NATIVE_ALGORITHMS") {
            self.algorithms.native_enabled = parse_flag("WIKIGRAPH_NATIVE_ALGORITHMS", &raw)?;
        }
        if let Some(key) = get("WIKIGRAPH_API_KEY") {
            self.server.api_key = Some(key);
        }
        if let Some(raw) = get("WIKIGRAPH_RATE_LIMIT") {
            self.server.rate_limit = parse_var("WIKIGRAPH_RATE_LIMIT", &raw)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), WikiGraphError> {
        if self.neo4j.uri.trim().is_empty() {
            return Err(WikiGraphError::Config("neo4j.uri must be set".to_string()));
        }
        if self.neo4j.max_connections == 0 {
            return Err(WikiGraphError::Config(
                "neo4j.max_connections must be at least 1".to_string(),
            ));
        }
        if self.neo4j.fetch_size == 0 {
            return Err(WikiGraphError::Config(
                "neo4j.fetch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, WikiGraphError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| WikiGraphError::Config(format!("{key}: {e}")))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, WikiGraphError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(WikiGraphError::Config(format!(
            "{key}: expected a boolean, got '{other}'"
        ))),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_neo4j() {
        let settings = Settings::default();
        assert_eq!(settings.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(settings.neo4j.user, "neo4j");
        assert!(settings.algorithms.native_enabled);
        assert!(!settings.server.debug);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            [neo4j]
            uri = "bolt://graph:7687"

            [algorithms]
            native_enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.neo4j.uri, "bolt://graph:7687");
        assert_eq!(settings.neo4j.password, "password");
        assert!(!settings.algorithms.native_enabled);
        assert_eq!(settings.server.port, 8000);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = Settings::from_toml("[neo4j\nuri=").unwrap_err();
        assert!(matches!(err, WikiGraphError::Config(_)));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut settings = Settings::default();
        settings
            .apply_env(env(&[
                ("NEO4J_URI", "bolt://prod:7687"),
                ("NEO4J_PASSWORD", "s3cret"),
                ("WIKIGRAPH_DEBUG", "true"),
                ("WIKIGRAPH_CORS_ORIGINS", "https://a.example, https://b.example"),
                ("WIKIGRAPH_NATIVE_ALGORITHMS", "off"),
                ("WIKIGRAPH_RATE_LIMIT", "0"),
            ]))
            .unwrap();
        assert_eq!(settings.neo4j.uri, "bolt://prod:7687");
        assert_eq!(settings.neo4j.password, "s3cret");
        assert!(settings.server.debug);
        assert_eq!(
            settings.server.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(!settings.algorithms.native_enabled);
        assert_eq!(settings.server.rate_limit, 0);
    }

    #[test]
    fn empty_environment_values_are_ignored() {
        let mut settings = Settings::default();
        settings
            .apply_env(env(&[("NEO4J_URI", ""), ("WIKIGRAPH_API_KEY", "  ")]))
            .unwrap();
        assert_eq!(settings.neo4j.uri, "bolt://localhost:7687");
        assert!(settings.server.api_key.is_none());
    }

    #[test]
    fn bad_numbers_and_flags_are_rejected() {
        let mut settings = Settings::default();
        assert!(
            settings
                .apply_env(env(&[("WIKIGRAPH_MAX_CONNECTIONS", "many")]))
                .is_err()
        );
        assert!(
            settings
                .apply_env(env(&[("WIKIGRAPH_DEBUG", "maybe")]))
                .is_err()
        );
        assert!(
            settings
                .apply_env(env(&[("WIKIGRAPH_MAX_CONNECTIONS", "0")]))
                .is_err()
        );
    }
}

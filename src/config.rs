//! Browser configuration
//!
//! Loaded from TOML at startup, falls back to defaults if no config file
//! exists. Credentials may also come from the environment.

use oslc_browser_client::{Credentials, FetchConfig, DEFAULT_RELAY_BASE};
use oslc_browser_core::{Error, LinkFilter, Result, Rule};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_USER: &str = "OSLC_BROWSER_USER";
pub const ENV_PASSWORD: &str = "OSLC_BROWSER_PASSWORD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub auth: AuthConfig,
    pub network: NetworkConfig,
    pub filters: FilterConfig,
    pub favorites: Vec<FavoriteFolder>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub user_id: String,
    /// Read from config but never written back out.
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Relay for targets that cannot be reached directly.
    pub relay_base: String,
    pub relay_enabled: bool,
    /// Proxy for servers that reject preview requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_proxy: Option<String>,
}

/// Rules added on top of (or instead of) the built-in link filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Start from the built-in link rules.
    pub use_defaults: bool,
    /// Predicate URIs never followed.
    pub links: Vec<String>,
    /// Regexes; a predicate matching anywhere is never followed.
    pub link_patterns: Vec<String>,
    /// Type URIs of resources hidden from the graph.
    pub artifacts: Vec<String>,
    pub artifact_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FavoriteFolder {
    pub name: String,
    pub items: Vec<Favorite>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Favorite {
    pub label: String,
    pub uri: String,
}

// ============================================================
// Defaults
// ============================================================

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            relay_base: DEFAULT_RELAY_BASE.into(),
            relay_enabled: true,
            fallback_proxy: None,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            use_defaults: true,
            links: Vec::new(),
            link_patterns: Vec::new(),
            artifacts: Vec::new(),
            artifact_patterns: Vec::new(),
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl BrowserConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the current config as TOML (for generating a default config file).
    /// The password is left out.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Take credentials from `OSLC_BROWSER_USER` / `OSLC_BROWSER_PASSWORD` when set.
    pub fn with_env_overrides(self) -> Self {
        let user = std::env::var(ENV_USER).ok();
        let password = std::env::var(ENV_PASSWORD).ok();
        self.with_credentials(user, password)
    }

    pub fn with_credentials(mut self, user: Option<String>, password: Option<String>) -> Self {
        if let Some(user) = user {
            self.auth.user_id = user;
        }
        if let Some(password) = password {
            self.auth.password = password;
        }
        self
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            credentials: Credentials::new(&self.auth.user_id, &self.auth.password),
            relay_base: self.network.relay_enabled.then(|| self.network.relay_base.clone()),
            ..Default::default()
        }
    }

    /// Build the link filter. Fails on the first invalid pattern, naming the
    /// key it came from.
    pub fn link_filter(&self) -> Result<LinkFilter> {
        let f = &self.filters;
        let mut filter = if f.use_defaults {
            LinkFilter::default()
        } else {
            LinkFilter::permissive()
        };
        for uri in &f.links {
            filter = filter.with_link_rule(Rule::exact(uri));
        }
        for pattern in &f.link_patterns {
            filter = filter.with_link_rule(config_pattern("filters.link_patterns", pattern)?);
        }
        for uri in &f.artifacts {
            filter = filter.with_artifact_rule(Rule::exact(uri));
        }
        for pattern in &f.artifact_patterns {
            filter = filter.with_artifact_rule(config_pattern("filters.artifact_patterns", pattern)?);
        }
        Ok(filter)
    }

    /// Look a favorite up by label, across all folders.
    pub fn favorite(&self, label: &str) -> Option<&Favorite> {
        self.favorites
            .iter()
            .flat_map(|folder| folder.items.iter())
            .find(|item| item.label == label)
    }
}

fn config_pattern(key: &str, pattern: &str) -> Result<Rule> {
    Rule::pattern(pattern).map_err(|e| Error::config(format!("{} entry {:?}: {}", key, pattern, e)))
}

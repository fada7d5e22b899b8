//! Endpoint configuration.
//!
//! The endpoint location is never hard-coded into a view. It is resolved
//! in layers: built-in defaults, then an optional TOML file, then the
//! `CRIME_DASH_*` environment variables. Callers (e.g. the CLI) may apply
//! their own overrides last.
//!
//! ```toml
//! base_url = "http://localhost:7200"
//! repository = "Vedanya"
//! namespace = "http://www.semanticweb.org/kruthi/ontologies/2024/11/untitled-ontology-13#"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Environment variable overriding [`EndpointConfig::base_url`].
pub const ENV_ENDPOINT: &str = "CRIME_DASH_ENDPOINT";
/// Environment variable overriding [`EndpointConfig::repository`].
pub const ENV_REPOSITORY: &str = "CRIME_DASH_REPOSITORY";
/// Environment variable overriding [`EndpointConfig::namespace`].
pub const ENV_NAMESPACE: &str = "CRIME_DASH_NAMESPACE";

/// Where queries are sent and which ontology namespace they use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Server root (e.g. `"http://localhost:7200"`). Trailing slashes are
    /// ignored.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Repository (named dataset) identifier on the server.
    #[serde(default = "default_repository")]
    pub repository: String,
    /// Ontology namespace IRI bound to the `smw:` prefix in every query.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_base_url() -> String {
    "http://localhost:7200".to_string()
}

fn default_repository() -> String {
    "Vedanya".to_string()
}

fn default_namespace() -> String {
    "http://www.semanticweb.org/kruthi/ontologies/2024/11/untitled-ontology-13#".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            repository: default_repository(),
            namespace: default_namespace(),
        }
    }
}

impl EndpointConfig {
    /// Parses a TOML document. Missing keys fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or a value is
    /// unusable.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading endpoint config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Resolves the config: defaults (or `path` if given), then environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be loaded or the final
    /// config is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides looked up by environment variable name. Empty
    /// values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = non_empty(ENV_ENDPOINT) {
            self.base_url = base_url;
        }
        if let Some(repository) = non_empty(ENV_REPOSITORY) {
            self.repository = repository;
        }
        if let Some(namespace) = non_empty(ENV_NAMESPACE) {
            self.namespace = namespace;
        }
        self
    }

    /// Full URL that queries are posted to:
    /// `{base_url}/repositories/{repository}`.
    #[must_use]
    pub fn query_url(&self) -> String {
        format!(
            "{}/repositories/{}",
            self.base_url.trim_end_matches('/'),
            self.repository
        )
    }

    /// Checks that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                message: format!("base_url must be an http(s) URL, got {:?}", self.base_url),
            });
        }
        if self.repository.is_empty() || self.repository.contains('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "repository must be a non-empty single path segment, got {:?}",
                    self.repository
                ),
            });
        }
        if !self.namespace.ends_with('#') && !self.namespace.ends_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "namespace must end with '#' or '/', got {:?}",
                    self.namespace
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EndpointConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.query_url(),
            "http://localhost:7200/repositories/Vedanya"
        );
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = EndpointConfig::from_toml_str(r#"repository = "crimes""#).unwrap();
        assert_eq!(config.repository, "crimes");
        assert_eq!(config.base_url, "http://localhost:7200");
    }

    #[test]
    fn trailing_slash_is_trimmed_from_query_url() {
        let config = EndpointConfig::from_toml_str(
            r#"
            base_url = "https://graphdb.example.org/"
            repository = "la"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.query_url(),
            "https://graphdb.example.org/repositories/la"
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            EndpointConfig::from_toml_str("endpoint = \"x\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            EndpointConfig::from_toml_str(r#"base_url = "localhost:7200""#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            EndpointConfig::from_toml_str(r#"repository = "a/b""#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            EndpointConfig::from_toml_str(r#"namespace = "http://example.org/ns""#),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn overrides_replace_non_empty_values_only() {
        let config = EndpointConfig::default().with_overrides(|key| match key {
            ENV_ENDPOINT => Some("http://remote:7200".to_string()),
            ENV_REPOSITORY => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://remote:7200");
        assert_eq!(config.repository, "Vedanya");
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            EndpointConfig::from_file(Path::new("/nonexistent/crime_dash.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}

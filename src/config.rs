//! # Router Configuration Module
//!
//! Settings that shape how request paths are normalized and matched.
//!
//! ## Environment Variables
//!
//! ### `HTF_PATH_SEPARATOR`
//!
//! Single character separating path segments. Default: `/`.
//!
//! ### `HTF_CONTEXT_PATH`
//!
//! Deployment prefix stripped from request URIs before routing, e.g. `/app`
//! when the service is mounted below `/app`. Default: empty.
//!
//! ### `HTF_PRESERVE_PARAM_CASE`
//!
//! `true` to hand URL parameters to the binder with the case they had in the
//! request. Matching stays case-insensitive either way. Default: `false`.
//!
//! ## YAML
//!
//! ```yaml
//! separator: "/"
//! context_path: /app
//! preserve_param_case: true
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::router::DEFAULT_SEPARATOR;

/// Router settings. Every field has a default, so partial YAML documents
/// are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    pub separator: char,
    pub context_path: String,
    pub preserve_param_case: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            context_path: String::new(),
            preserve_param_case: false,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(val) = env::var("HTF_PATH_SEPARATOR") {
            let mut chars = val.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => config.separator = c,
                _ => bail!("HTF_PATH_SEPARATOR must be a single character, got `{val}`"),
            }
        }
        if let Ok(val) = env::var("HTF_CONTEXT_PATH") {
            config.context_path = val;
        }
        if let Ok(val) = env::var("HTF_PRESERVE_PARAM_CASE") {
            config.preserve_param_case = val
                .parse()
                .with_context(|| format!("HTF_PRESERVE_PARAM_CASE must be true or false, got `{val}`"))?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("parsing router configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading router configuration {}", path.display()))?;
        Self::from_yaml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// The separator cannot be alphanumeric or whitespace: it would split
    /// ordinary segment text.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_alphanumeric() || self.separator.is_whitespace() {
            bail!("invalid path separator {:?}", self.separator);
        }
        if self.context_path.chars().any(char::is_whitespace) {
            bail!("context path `{}` contains whitespace", self.context_path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.separator, '/');
        assert!(config.context_path.is_empty());
        assert!(!config.preserve_param_case);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let config = RouterConfig::from_yaml_str("context_path: /app\n").unwrap();
        assert_eq!(config.context_path, "/app");
        assert_eq!(config.separator, '/');
    }

    #[test]
    fn test_rejects_bad_separator() {
        assert!(RouterConfig::from_yaml_str("separator: a\n").is_err());
        assert!(RouterConfig::from_yaml_str("separator: \" \"\n").is_err());
        assert!(RouterConfig::from_yaml_str("separator: \".\"\n").is_ok());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(RouterConfig::from_yaml_str("seperator: /\n").is_err());
    }
}

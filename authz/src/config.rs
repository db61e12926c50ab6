//! Engine Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::error::AuthzError;
use crate::permissions::{FeatureCatalog, UnmappedFeaturePolicy};

/// Where the engine takes a snapshot's permissions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionSource {
    /// Trust the permissions supplied with the snapshot.
    Snapshot,
    /// Recompute permissions from the snapshot's roles.
    #[default]
    Roles,
}

impl PermissionSource {
    /// Parse `snapshot` / `roles`, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "snapshot" => Some(Self::Snapshot),
            "roles" | "derived" => Some(Self::Roles),
            _ => None,
        }
    }
}

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzConfig {
    /// Permission source for facade checks (default: roles)
    pub permission_source: PermissionSource,

    /// Policy for feature names missing from the catalog (default: allow)
    pub unmapped_features: UnmappedFeaturePolicy,

    /// JSON feature catalog to load instead of the built-in one (optional)
    pub feature_catalog_path: Option<PathBuf>,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,

    /// Emit logs as JSON (default: true)
    pub log_json: bool,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            permission_source: PermissionSource::default(),
            unmapped_features: UnmappedFeaturePolicy::default(),
            feature_catalog_path: None,
            log_filter: "lp_authz=info".into(),
            log_json: true,
        }
    }
}

impl AuthzConfig {
    /// Load `.env` if present, then read the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AUTHZ_PERMISSION_SOURCE`: `snapshot` or `roles` (default: roles)
    /// - `AUTHZ_UNMAPPED_FEATURES`: `allow` or `deny` (default: allow)
    /// - `AUTHZ_FEATURE_CATALOG`: Path to a JSON feature catalog
    /// - `AUTHZ_LOG_FILTER`: Default log filter (default: "lp_authz=info")
    /// - `AUTHZ_LOG_JSON`: JSON log output (default: true)
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = env::var("AUTHZ_PERMISSION_SOURCE") {
            config.permission_source = PermissionSource::parse(&val)
                .ok_or_else(|| invalid("AUTHZ_PERMISSION_SOURCE", &val))
                .context("AUTHZ_PERMISSION_SOURCE must be 'snapshot' or 'roles'")?;
        }
        if let Ok(val) = env::var("AUTHZ_UNMAPPED_FEATURES") {
            config.unmapped_features = UnmappedFeaturePolicy::parse(&val)
                .ok_or_else(|| invalid("AUTHZ_UNMAPPED_FEATURES", &val))
                .context("AUTHZ_UNMAPPED_FEATURES must be 'allow' or 'deny'")?;
        }
        config.feature_catalog_path = env::var("AUTHZ_FEATURE_CATALOG")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        if let Ok(val) = env::var("AUTHZ_LOG_FILTER") {
            config.log_filter = val;
        }
        if let Ok(val) = env::var("AUTHZ_LOG_JSON") {
            config.log_json = val
                .trim()
                .parse()
                .map_err(|_| invalid("AUTHZ_LOG_JSON", &val))
                .context("AUTHZ_LOG_JSON must be 'true' or 'false'")?;
        }

        Ok(config)
    }

    /// Build the feature catalog this configuration describes.
    ///
    /// Reads `feature_catalog_path` when set, otherwise uses the built-in
    /// catalog. The configured unmapped-feature policy is applied either way.
    pub fn feature_catalog(&self) -> Result<FeatureCatalog> {
        let catalog = match &self.feature_catalog_path {
            Some(path) => {
                let catalog = FeatureCatalog::from_path(path).with_context(|| {
                    format!("Failed to load feature catalog {}", path.display())
                })?;
                tracing::info!(path = %path.display(), entries = catalog.len(), "Loaded feature catalog");
                catalog
            }
            None => FeatureCatalog::builtin(),
        };
        Ok(catalog.with_unmapped_policy(self.unmapped_features))
    }

    /// Create a configuration for tests: fail-closed catalog, plain logs.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            permission_source: PermissionSource::Roles,
            unmapped_features: UnmappedFeaturePolicy::Deny,
            feature_catalog_path: None,
            log_filter: "lp_authz=debug".into(),
            log_json: false,
        }
    }
}

fn invalid(key: &'static str, value: &str) -> AuthzError {
    AuthzError::InvalidSetting {
        key,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "AUTHZ_PERMISSION_SOURCE",
        "AUTHZ_UNMAPPED_FEATURES",
        "AUTHZ_FEATURE_CATALOG",
        "AUTHZ_LOG_FILTER",
        "AUTHZ_LOG_JSON",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = AuthzConfig::default();
        assert_eq!(config.permission_source, PermissionSource::Roles);
        assert_eq!(config.unmapped_features, UnmappedFeaturePolicy::Allow);
        assert!(config.feature_catalog_path.is_none());
        assert_eq!(config.log_filter, "lp_authz=info");
        assert!(config.log_json);
    }

    #[test]
    fn test_permission_source_parse() {
        assert_eq!(PermissionSource::parse("SNAPSHOT"), Some(PermissionSource::Snapshot));
        assert_eq!(PermissionSource::parse(" roles "), Some(PermissionSource::Roles));
        assert_eq!(PermissionSource::parse("derived"), Some(PermissionSource::Roles));
        assert_eq!(PermissionSource::parse("cache"), None);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = AuthzConfig::from_env().unwrap();
        assert_eq!(config, AuthzConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("AUTHZ_PERMISSION_SOURCE", "snapshot");
        env::set_var("AUTHZ_UNMAPPED_FEATURES", "deny");
        env::set_var("AUTHZ_FEATURE_CATALOG", "/etc/lp/catalog.json");
        env::set_var("AUTHZ_LOG_FILTER", "lp_authz=trace");
        env::set_var("AUTHZ_LOG_JSON", "false");

        let config = AuthzConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.permission_source, PermissionSource::Snapshot);
        assert_eq!(config.unmapped_features, UnmappedFeaturePolicy::Deny);
        assert_eq!(
            config.feature_catalog_path,
            Some(PathBuf::from("/etc/lp/catalog.json"))
        );
        assert_eq!(config.log_filter, "lp_authz=trace");
        assert!(!config.log_json);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_invalid_values() {
        clear_env();
        env::set_var("AUTHZ_PERMISSION_SOURCE", "sometimes");
        let err = AuthzConfig::from_env().unwrap_err();
        clear_env();
        assert!(format!("{err:#}").contains("sometimes"));

        env::set_var("AUTHZ_LOG_JSON", "yes please");
        assert!(AuthzConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_catalog_path_is_ignored() {
        clear_env();
        env::set_var("AUTHZ_FEATURE_CATALOG", "  ");
        let config = AuthzConfig::from_env().unwrap();
        clear_env();
        assert!(config.feature_catalog_path.is_none());
    }

    #[test]
    fn test_feature_catalog_applies_policy() {
        let config = AuthzConfig::default_for_test();
        let catalog = config.feature_catalog().unwrap();
        assert_eq!(catalog.unmapped_policy(), UnmappedFeaturePolicy::Deny);
        assert!(catalog.permissions_for("reports").is_some());
    }

    #[test]
    fn test_feature_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{"beta": ["report_export"]}"#).unwrap();

        let config = AuthzConfig {
            feature_catalog_path: Some(file.path().to_path_buf()),
            ..AuthzConfig::default()
        };
        let catalog = config.feature_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.unmapped_policy(), UnmappedFeaturePolicy::Allow);
    }

    #[test]
    fn test_feature_catalog_missing_file_has_context() {
        let config = AuthzConfig {
            feature_catalog_path: Some(PathBuf::from("/nonexistent/catalog.json")),
            ..AuthzConfig::default()
        };
        let err = config.feature_catalog().unwrap_err();
        assert!(err.to_string().contains("Failed to load feature catalog"));
    }
}

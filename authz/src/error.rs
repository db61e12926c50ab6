//! Authorization Error Types

use std::path::PathBuf;

use thiserror::Error;

use crate::permissions::{Feature, PermissionSet, Role, RoleSet};

/// Errors raised while loading configuration or a feature catalog.
///
/// Access decisions themselves never fail; see [`AccessDenied`] for the
/// `require_*` style helpers.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Catalog file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not valid JSON of the expected shape.
    #[error("Invalid feature catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// Catalog references a permission outside the vocabulary.
    #[error("Unknown permission code '{code}' in feature '{feature}'")]
    UnknownPermission { feature: String, code: String },

    /// A configuration value could not be understood.
    #[error("Invalid value '{value}' for {key}")]
    InvalidSetting { key: &'static str, value: String },
}

/// Why a `require_*` check refused access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// Query required a signed-in user.
    #[error("Authentication required")]
    Unauthenticated,

    /// User holds a role the query excludes.
    #[error("Access is not available to role {0}")]
    ExcludedRole(Role),

    /// User lacks required permissions.
    #[error("Missing permissions: {0:?}")]
    MissingPermissions(PermissionSet),

    /// User lacks required roles.
    #[error("Missing roles: {0:?}")]
    MissingRoles(RoleSet),

    /// None of the user's roles enable a requested feature.
    #[error("None of the requested features are enabled: {0:?}")]
    MissingFeature(Vec<Feature>),

    /// Role hierarchy level too low.
    #[error("Requires role level {required} (current level: {actual})")]
    InsufficientLevel { required: u8, actual: u8 },

    /// Feature catalog refused the feature.
    #[error("Feature '{0}' is not available")]
    FeatureUnavailable(String),

    /// Combined permission/role check failed.
    #[error("Access denied")]
    Forbidden,
}

/// Result type for fallible loading operations.
pub type AuthzResult<T> = Result<T, AuthzError>;

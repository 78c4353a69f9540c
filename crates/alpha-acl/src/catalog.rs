//! Role catalog: load, save and look up roles.
//!
//! JSON files hold a top-level array of roles in the admin UI shape. TOML
//! files hold the same roles under a `roles` array of tables.

use std::fs;
use std::path::{Path, PathBuf};

use alpha_types::RoleId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::roles::{Role, RoleWarning, StandardRoles};

/// Errors raised while reading or writing role catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read roles file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write roles file at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse JSON roles: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML roles: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML roles: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Unsupported roles file format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("Duplicate role id {0}")]
    DuplicateRoleId(RoleId),
}

/// File format of a role catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
}

impl CatalogFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    roles: Vec<Role>,
}

/// Ordered collection of roles with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleCatalog {
    roles: Vec<Role>,
}

impl RoleCatalog {
    /// Builds a catalog, rejecting duplicate role ids.
    pub fn new(roles: Vec<Role>) -> Result<Self, CatalogError> {
        for (i, role) in roles.iter().enumerate() {
            if roles[..i].iter().any(|r| r.id == role.id) {
                return Err(CatalogError::DuplicateRoleId(role.id.clone()));
            }
        }
        Ok(Self { roles })
    }

    /// The standard Basic/Advanced/Expert/Unlim roles.
    pub fn standard() -> Self {
        Self {
            roles: StandardRoles::all(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, CatalogError> {
        let roles: Vec<Role> = serde_json::from_str(s)?;
        Self::new(roles)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let catalog: TomlCatalog = toml::from_str(s)?;
        Self::new(catalog.roles)
    }

    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.roles)?)
    }

    pub fn to_toml_string(&self) -> Result<String, CatalogError> {
        let catalog = TomlCatalog {
            roles: self.roles.clone(),
        };
        Ok(toml::to_string_pretty(&catalog)?)
    }

    /// Loads a catalog; the format follows the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let format = CatalogFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = match format {
            CatalogFormat::Json => Self::from_json_str(&content)?,
            CatalogFormat::Toml => Self::from_toml_str(&content)?,
        };

        debug!(path = %path.display(), roles = catalog.len(), "Loaded role catalog");
        for (role, warning) in catalog.lint() {
            warn!(role = %role, "{warning}");
        }

        Ok(catalog)
    }

    /// Saves the catalog; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let path = path.as_ref();
        let content = match CatalogFormat::from_path(path)? {
            CatalogFormat::Json => self.to_json_string()?,
            CatalogFormat::Toml => self.to_toml_string()?,
        };
        fs::write(path, content).map_err(|source| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, id: &RoleId) -> Option<&Role> {
        self.roles.iter().find(|r| &r.id == id)
    }

    /// Looks a role up by name, ignoring case and surrounding whitespace.
    pub fn find_by_name(&self, name: &str) -> Option<&Role> {
        let name = name.trim();
        self.roles.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn into_roles(self) -> Vec<Role> {
        self.roles
    }

    /// Warnings for every role, tagged with the role name.
    pub fn lint(&self) -> Vec<(String, RoleWarning)> {
        self.roles
            .iter()
            .flat_map(|role| role.lint().into_iter().map(|w| (role.name.clone(), w)))
            .collect()
    }
}

//! Package export catalog.
//!
//! gosem does not load compiled Go packages. Instead, the resolver looks up
//! members of imported packages in a catalog listing each package's exported
//! type names and constants (with their types). A catalog of common standard
//! library packages is bundled; more can be merged from JSON files with the
//! same schema.

use crate::resolver::{Declaration, ObjectKind};
use crate::universe;
use gosem_core::{CatalogConfig, GosemError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

const EMBEDDED_CATALOG: &str = include_str!("stdlib.json");

/// On-disk catalog format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub packages: Vec<PackageExports>,
}

/// Exported names of a single package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageExports {
    /// Import path, e.g. `net/http`.
    pub path: String,
    /// Package name when it differs from the last path segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exported named types.
    #[serde(default)]
    pub types: Vec<String>,
    /// Exported types that are basic (only `unsafe.Pointer` in practice).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub basic_types: Vec<String>,
    /// Exported constants mapped to their type: a type of this package, a
    /// predeclared basic type, or `untyped <kind>`.
    #[serde(default)]
    pub constants: BTreeMap<String, String>,
}

impl PackageExports {
    /// Name the package is imported under when no alias is given.
    pub fn package_name(&self) -> &str {
        match &self.name {
            Some(name) => name.as_str(),
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }

    /// Look up an exported member. Only types and constants are listed, so
    /// functions and variables are `None`.
    pub fn lookup(&self, member: &str) -> Option<Declaration> {
        if self.basic_types.iter().any(|t| t == member) {
            return Some(Declaration {
                name: member.to_string(),
                kind: ObjectKind::TypeName,
                basic: true,
            });
        }
        if self.types.iter().any(|t| t == member) {
            return Some(Declaration {
                name: member.to_string(),
                kind: ObjectKind::TypeName,
                basic: false,
            });
        }
        let ty = self.constants.get(member)?;
        Some(Declaration {
            name: member.to_string(),
            kind: ObjectKind::Const,
            basic: is_basic_constant_type(ty),
        })
    }
}

/// Whether a catalog constant type denotes a basic type.
fn is_basic_constant_type(ty: &str) -> bool {
    ty.starts_with("untyped") || universe::is_basic_type(ty)
}

/// Import path -> exported names.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    packages: HashMap<String, PackageExports>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The bundled standard library catalog, parsed once per process.
    pub fn embedded() -> &'static Catalog {
        static EMBEDDED: OnceLock<Catalog> = OnceLock::new();
        EMBEDDED.get_or_init(|| {
            Catalog::from_json(EMBEDDED_CATALOG).unwrap_or_else(|e| {
                tracing::error!("Bundled package catalog is invalid: {e}");
                Catalog::empty()
            })
        })
    }

    pub fn from_json(json: &str) -> Result<Self, GosemError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| GosemError::Catalog(e.to_string()))?;
        Ok(Self::from(file))
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self, GosemError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| GosemError::Catalog(format!("{}: {e}", path.display())))
    }

    /// Build the catalog described by the configuration: the embedded catalog
    /// (if enabled) followed by every extra file, later packages overriding
    /// earlier ones with the same path.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, GosemError> {
        let mut catalog = if config.embedded {
            Self::embedded().clone()
        } else {
            Self::empty()
        };
        for path in &config.extra_paths {
            let extra = Self::load(path)?;
            tracing::debug!(
                "Merging {} catalog packages from {}",
                extra.len(),
                path.display()
            );
            catalog.merge(extra);
        }
        Ok(catalog)
    }

    pub fn merge(&mut self, other: Catalog) {
        self.packages.extend(other.packages);
    }

    pub fn package(&self, path: &str) -> Option<&PackageExports> {
        self.packages.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.packages.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Import paths in sorted order.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.packages.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

impl From<CatalogFile> for Catalog {
    fn from(file: CatalogFile) -> Self {
        let packages = file
            .packages
            .into_iter()
            .map(|p| (p.path.clone(), p))
            .collect();
        Self { packages }
    }
}
